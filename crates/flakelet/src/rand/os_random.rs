use rand::{TryRngCore, rngs::OsRng};

use crate::{Error, RandSource, Result};

/// A `RandSource` that reads directly from the operating system's secure
/// random number generator (`getrandom`).
///
/// Every call performs a syscall, which is fine for the one-off draws made
/// when a generator picks its discriminator. Failures are reported as
/// [`Error::Entropy`] rather than falling back to a weaker source.
#[derive(Default, Clone, Copy, Debug)]
pub struct OsRandom;

impl RandSource<u8> for OsRandom {
    fn try_rand(&self) -> Result<u8> {
        let mut byte = [0u8; 1];
        OsRng
            .try_fill_bytes(&mut byte)
            .map_err(|e| Error::Entropy(e.to_string()))?;
        Ok(byte[0])
    }
}

impl RandSource<u64> for OsRandom {
    fn try_rand(&self) -> Result<u64> {
        OsRng
            .try_next_u64()
            .map_err(|e| Error::Entropy(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_random_produces_values() {
        let rng = OsRandom;
        let _: u8 = rng.try_rand().unwrap();
        let draws: Vec<u64> = (0..8).map(|_| rng.try_rand().unwrap()).collect();
        // Eight identical 64-bit draws would mean the source is broken.
        assert!(draws.iter().any(|d| *d != draws[0]));
    }
}
