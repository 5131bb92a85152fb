use core::fmt;

use crate::{
    Error, Result,
    id::{DISCRIMINATOR_MASK, MAX_DISCRIMINATOR},
    rand::RandSource,
};

/// The 6-bit value stored in the low bits of every snowflake.
///
/// Two generators that share a discriminator can emit the same value if they
/// issue the same millisecond, so independent instances should be given
/// distinct discriminators. Nothing in this crate allocates them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Discriminator(u8);

impl Discriminator {
    /// The smallest discriminator.
    pub const MIN: Self = Self(0);

    /// The largest discriminator.
    pub const MAX: Self = Self(MAX_DISCRIMINATOR);

    /// Creates a discriminator, rejecting values above
    /// [`MAX_DISCRIMINATOR`](crate::MAX_DISCRIMINATOR).
    ///
    /// # Errors
    /// Returns [`Error::InvalidDiscriminator`] if `value > 63`.
    ///
    /// # Example
    /// ```
    /// use flakelet::Discriminator;
    ///
    /// assert_eq!(Discriminator::new(63).unwrap().get(), 63);
    /// assert!(Discriminator::new(64).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self> {
        if value > MAX_DISCRIMINATOR {
            return Err(Error::InvalidDiscriminator {
                value: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Draws a discriminator from `rng`, reduced modulo 64.
    ///
    /// # Errors
    /// Propagates any failure of the random source.
    pub fn random<R>(rng: &R) -> Result<Self>
    where
        R: RandSource<u8>,
    {
        let byte = rng.try_rand()?;
        Ok(Self::from_masked(byte))
    }

    /// Keeps the low six bits of `bits`.
    pub(crate) const fn from_masked(bits: u8) -> Self {
        Self(bits & DISCRIMINATOR_MASK as u8)
    }

    /// Returns the raw 6-bit value.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Discriminator {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= MAX_DISCRIMINATOR)
            .map(Self)
            .ok_or(Error::InvalidDiscriminator { value })
    }
}

impl TryFrom<u8> for Discriminator {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Discriminator> for u64 {
    fn from(value: Discriminator) -> Self {
        Self::from(value.0)
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRand(u8);

    impl RandSource<u8> for FixedRand {
        fn try_rand(&self) -> Result<u8> {
            Ok(self.0)
        }
    }

    struct FailingRand;

    impl RandSource<u8> for FailingRand {
        fn try_rand(&self) -> Result<u8> {
            Err(Error::Entropy("unavailable".into()))
        }
    }

    #[test]
    fn accepts_bounds() {
        assert_eq!(Discriminator::new(0).unwrap().get(), 0);
        assert_eq!(Discriminator::new(63).unwrap().get(), 63);
        assert_eq!(Discriminator::try_from(0i64).unwrap(), Discriminator::MIN);
        assert_eq!(Discriminator::try_from(63i64).unwrap(), Discriminator::MAX);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            Discriminator::new(64),
            Err(Error::InvalidDiscriminator { value: 64 })
        );
        assert_eq!(
            Discriminator::try_from(64i64),
            Err(Error::InvalidDiscriminator { value: 64 })
        );
        assert_eq!(
            Discriminator::try_from(-1i64),
            Err(Error::InvalidDiscriminator { value: -1 })
        );
        assert_eq!(
            Discriminator::try_from(i64::MAX),
            Err(Error::InvalidDiscriminator { value: i64::MAX })
        );
    }

    #[test]
    fn random_reduces_modulo_64() {
        assert_eq!(Discriminator::random(&FixedRand(0)).unwrap().get(), 0);
        assert_eq!(Discriminator::random(&FixedRand(63)).unwrap().get(), 63);
        assert_eq!(Discriminator::random(&FixedRand(64)).unwrap().get(), 0);
        assert_eq!(Discriminator::random(&FixedRand(200)).unwrap().get(), 200 % 64);
        assert_eq!(Discriminator::random(&FixedRand(255)).unwrap().get(), 63);
    }

    #[test]
    fn random_propagates_entropy_failure() {
        assert!(matches!(
            Discriminator::random(&FailingRand),
            Err(Error::Entropy(_))
        ));
    }
}
