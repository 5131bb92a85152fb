use core::{fmt, str::FromStr};

use crate::{Discriminator, Error, Result, token};

/// Number of low bits reserved for the [`Discriminator`].
pub const DISCRIMINATOR_BITS: u32 = 6;

/// Mask selecting the discriminator bits of a raw snowflake.
pub const DISCRIMINATOR_MASK: u64 = (1 << DISCRIMINATOR_BITS) - 1;

/// The largest valid discriminator.
pub const MAX_DISCRIMINATOR: u8 = DISCRIMINATOR_MASK as u8;

/// Number of high bits holding the millisecond timestamp.
pub const TIMESTAMP_BITS: u32 = u64::BITS - DISCRIMINATOR_BITS;

/// The largest millisecond timestamp that fits above the discriminator.
pub const MAX_TIMESTAMP: u64 = (1 << TIMESTAMP_BITS) - 1;

/// A generated identifier: a millisecond timestamp packed above a 6-bit
/// discriminator.
///
/// ```text
///  Bit Index:  63                6 5                 0
///              +------------------+-------------------+
///  Field:      | timestamp (58)   | discriminator (6) |
///              +------------------+-------------------+
///              |<----- MSB -- 64 bits -- LSB -------->|
/// ```
///
/// Ordering and equality follow the raw integer. [`Display`](fmt::Display)
/// renders the compact token produced by [`token::encode`], and
/// [`FromStr`] accepts any token [`token::decode`] accepts.
///
/// # Example
/// ```
/// use flakelet::{Discriminator, Snowflake};
///
/// let id = Snowflake::from_parts(1_000, Discriminator::new(5).unwrap()).unwrap();
/// assert_eq!(id.timestamp(), 1_000);
/// assert_eq!(id.discriminator().get(), 5);
///
/// let parsed: Snowflake = id.to_string().parse().unwrap();
/// assert_eq!(parsed, id);
/// ```
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Snowflake(u64);

impl Snowflake {
    /// Packs a timestamp and discriminator.
    ///
    /// # Errors
    /// Returns [`Error::TimestampOverflow`] if `timestamp` exceeds
    /// [`MAX_TIMESTAMP`].
    pub fn from_parts(timestamp: u64, discriminator: Discriminator) -> Result<Self> {
        if timestamp > MAX_TIMESTAMP {
            return Err(Error::TimestampOverflow { last: timestamp });
        }
        Ok(Self::from_parts_unchecked(timestamp, discriminator))
    }

    /// Packs a timestamp already known to fit in [`TIMESTAMP_BITS`].
    pub(crate) const fn from_parts_unchecked(timestamp: u64, discriminator: Discriminator) -> Self {
        debug_assert!(timestamp <= MAX_TIMESTAMP);
        Self((timestamp << DISCRIMINATOR_BITS) | discriminator.get() as u64)
    }

    /// Wraps a raw value. Every `u64` is a valid snowflake.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the packed integer.
    pub const fn to_raw(self) -> u64 {
        self.0
    }

    /// Milliseconds since the generator's epoch.
    pub const fn timestamp(self) -> u64 {
        self.0 >> DISCRIMINATOR_BITS
    }

    pub fn discriminator(self) -> Discriminator {
        Discriminator::from_masked(self.0 as u8)
    }

    /// Renders the compact, leading-zero-trimmed token.
    pub fn to_token(self) -> String {
        token::encode(self.0)
    }

    /// Renders the fixed-width, 11 character token.
    pub fn to_fixed_token(self) -> String {
        token::encode_fixed(self.0)
    }

    /// Decodes a token produced by [`Self::to_token`] or
    /// [`Self::to_fixed_token`].
    ///
    /// # Errors
    /// See [`token::decode`].
    pub fn from_token(token: &str) -> Result<Self> {
        token::decode(token).map(Self)
    }
}

impl From<Snowflake> for u64 {
    fn from(value: Snowflake) -> Self {
        value.0
    }
}

impl From<u64> for Snowflake {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token())
    }
}

impl fmt::Debug for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snowflake")
            .field("raw", &self.0)
            .field("timestamp", &self.timestamp())
            .field("discriminator", &self.discriminator().get())
            .finish()
    }
}

impl FromStr for Snowflake {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s)
    }
}
