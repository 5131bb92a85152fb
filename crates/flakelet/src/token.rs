//! URL-safe text encoding of snowflake values.
//!
//! A token is the big-endian byte representation of a `u64`, encoded with the
//! URL-safe base64 alphabet (`A-Z a-z 0-9 - _`) and no `=` padding.
//!
//! [`encode`] drops leading zero bytes first (keeping at least one), so small
//! values produce short tokens. Tokens of different lengths do **not** sort
//! lexicographically in numeric order; compare decoded values instead.
//! [`encode_fixed`] keeps all eight bytes and always yields 11 characters.
//!
//! ```
//! use flakelet::token;
//!
//! assert_eq!(token::encode(0), "AA");
//! assert_eq!(token::encode(0xFB_FF), "-_8");
//! assert_eq!(token::encode_fixed(0xFB_FF), "AAAAAAAA-_8");
//! assert_eq!(token::decode("-_8").unwrap(), 0xFB_FF);
//! ```

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{Error, Result};

const SIZE: usize = core::mem::size_of::<u64>();

/// Length of every token produced by [`encode_fixed`].
pub const FIXED_TOKEN_LEN: usize = 11;

/// Encodes `value` as a compact token with leading zero bytes removed.
pub fn encode(value: u64) -> String {
    let bytes = value.to_be_bytes();
    let first = bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(SIZE - 1);
    URL_SAFE_NO_PAD.encode(&bytes[first..])
}

/// Encodes all eight bytes of `value`, yielding a fixed-width token.
pub fn encode_fixed(value: u64) -> String {
    URL_SAFE_NO_PAD.encode(value.to_be_bytes())
}

/// Decodes a token produced by [`encode`] or [`encode_fixed`].
///
/// Missing leading zero bytes are restored, so both forms of the same value
/// decode to the same integer.
///
/// # Errors
/// - [`Error::TokenDecode`] if the input contains padding, characters outside
///   the URL-safe alphabet, or non-canonical trailing bits.
/// - [`Error::TokenLength`] if the input decodes to zero or more than eight
///   bytes.
pub fn decode(token: &str) -> Result<u64> {
    let decoded = URL_SAFE_NO_PAD.decode(token)?;
    if decoded.is_empty() || decoded.len() > SIZE {
        return Err(Error::TokenLength { len: decoded.len() });
    }

    let mut bytes = [0u8; SIZE];
    bytes[SIZE - decoded.len()..].copy_from_slice(&decoded);
    Ok(u64::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_url_safe(token: &str) -> bool {
        token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }

    #[test]
    fn zero_keeps_one_byte() {
        assert_eq!(encode(0), "AA");
        assert_eq!(decode("AA").unwrap(), 0);
    }

    #[test]
    fn trims_leading_zero_bytes() {
        assert_eq!(encode(1), "AQ");
        assert_eq!(encode(0xFF), "_w");
        assert_eq!(encode(0x0100), "AQA");
        assert_eq!(encode(0x0102_0304), "AQIDBA");
        assert_eq!(encode(u64::MAX), "__________8");
    }

    #[test]
    fn uses_url_safe_substitutions() {
        // 0xFBFF encodes to "+/8" in the standard alphabet.
        assert_eq!(encode(0xFBFF), "-_8");
    }

    #[test]
    fn length_grows_with_significant_bytes() {
        let lengths: Vec<usize> = (0..8)
            .map(|shift| encode(1u64 << (shift * 8)).len())
            .collect();
        assert_eq!(lengths, vec![2, 3, 4, 6, 7, 8, 10, 11]);
    }

    #[test]
    fn fixed_width_is_always_eleven_chars() {
        for value in [0, 1, 0xFFFF, 1 << 40, u64::MAX] {
            let token = encode_fixed(value);
            assert_eq!(token.len(), FIXED_TOKEN_LEN);
            assert_eq!(decode(&token).unwrap(), value);
        }
    }

    #[test]
    fn decode_recovers_original_values() {
        let values = [
            0,
            1,
            63,
            64,
            0xFF,
            0x100,
            (1_000_000 << 6) | 5,
            (((1u64 << 58) - 1) << 6) | 63,
            0x0000_0100_0000_0000,
        ];
        for value in values {
            let token = encode(value);
            assert!(is_url_safe(&token), "{token}");
            assert!(!token.contains('='));
            assert_eq!(decode(&token).unwrap(), value, "{token}");
        }
    }

    #[test]
    fn decode_is_deterministic() {
        let value = (123_456_789 << 6) | 42;
        assert_eq!(encode(value), encode(value));
    }

    #[test]
    fn decode_rejects_padding() {
        assert!(matches!(decode("AQ=="), Err(Error::TokenDecode(_))));
    }

    #[test]
    fn decode_rejects_standard_alphabet() {
        assert!(matches!(decode("+/8"), Err(Error::TokenDecode(_))));
    }

    #[test]
    fn decode_rejects_empty_and_oversized() {
        assert_eq!(decode(""), Err(Error::TokenLength { len: 0 }));
        // Nine bytes.
        let nine = URL_SAFE_NO_PAD.encode([1u8; 9]);
        assert_eq!(decode(&nine), Err(Error::TokenLength { len: 9 }));
    }

    #[test]
    fn decode_rejects_non_canonical_trailing_bits() {
        // "AR" carries set bits past the end of the single encoded byte.
        assert!(matches!(decode("AR"), Err(Error::TokenDecode(_))));
    }
}
