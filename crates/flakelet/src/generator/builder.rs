use crate::{
    AtomicSnowflakeGenerator, BasicSnowflakeGenerator, Discriminator, LockSnowflakeGenerator,
    MonotonicClock, OsRandom, RandSource, Result, time::SystemTime,
};

/// Builds a generator from an optional discriminator and an optional epoch.
///
/// - Without a discriminator, one is drawn from [`OsRandom`] modulo 64.
/// - Without an epoch, [`DEFAULT_EPOCH`](crate::DEFAULT_EPOCH) (2000-01-01
///   UTC) is used.
///
/// The discriminator is validated before anything else, so an out-of-range
/// value fails without touching the clock or the random source.
///
/// # Example
/// ```
/// use flakelet::{Error, GeneratorBuilder};
///
/// let generator = GeneratorBuilder::new().discriminator(5).build_atomic().unwrap();
/// assert_eq!(generator.next_timestamp().unwrap() & 0x3F, 5);
///
/// let err = GeneratorBuilder::new().discriminator(64).build_atomic();
/// assert!(matches!(err, Err(Error::InvalidDiscriminator { value: 64 })));
/// ```
#[derive(Clone, Debug, Default)]
pub struct GeneratorBuilder {
    discriminator: Option<i64>,
    epoch: Option<SystemTime>,
}

impl GeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the discriminator. Checked against `[0, 63]` when building.
    #[must_use]
    pub fn discriminator(mut self, value: impl Into<i64>) -> Self {
        self.discriminator = Some(value.into());
        self
    }

    /// Sets the epoch that timestamps are measured from.
    #[must_use]
    pub fn epoch(mut self, epoch: SystemTime) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// # Errors
    /// - [`Error::InvalidDiscriminator`](crate::Error::InvalidDiscriminator)
    ///   if the discriminator is outside `[0, 63]`.
    /// - [`Error::Entropy`](crate::Error::Entropy) if a random discriminator
    ///   was needed and the OS could not provide one.
    /// - [`Error::EpochOutOfRange`](crate::Error::EpochOutOfRange) if the
    ///   epoch is too far in the past.
    pub fn build_atomic(&self) -> Result<AtomicSnowflakeGenerator<MonotonicClock>> {
        let (discriminator, clock) = self.resolve(&OsRandom)?;
        Ok(AtomicSnowflakeGenerator::new(discriminator, clock))
    }

    /// # Errors
    /// See [`Self::build_atomic`].
    pub fn build_lock(&self) -> Result<LockSnowflakeGenerator<MonotonicClock>> {
        let (discriminator, clock) = self.resolve(&OsRandom)?;
        Ok(LockSnowflakeGenerator::new(discriminator, clock))
    }

    /// # Errors
    /// See [`Self::build_atomic`].
    pub fn build_basic(&self) -> Result<BasicSnowflakeGenerator<MonotonicClock>> {
        let (discriminator, clock) = self.resolve(&OsRandom)?;
        Ok(BasicSnowflakeGenerator::new(discriminator, clock))
    }

    fn resolve<R>(&self, rng: &R) -> Result<(Discriminator, MonotonicClock)>
    where
        R: RandSource<u8>,
    {
        let discriminator = match self.discriminator {
            Some(value) => Discriminator::try_from(value)?,
            None => Discriminator::random(rng)?,
        };
        let clock = match self.epoch {
            Some(epoch) => MonotonicClock::with_epoch(epoch)?,
            None => MonotonicClock::try_default()?,
        };
        Ok((discriminator, clock))
    }
}
