#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Discriminator, GeneratorBuilder, MAX_TIMESTAMP, MonotonicClock, Result, Snowflake,
    generator::{Mutex, SnowflakeGenerator, advance},
    time::TimeSource,
};

/// A lock-based snowflake generator suitable for multi-threaded environments.
///
/// The last issued timestamp is guarded by a [`Mutex`]. The clock is read and
/// the counter advanced while the lock is held, so callers are served one at a
/// time.
///
/// ## Features
/// - ✅ Thread-safe
/// - ❌ Lock-free
///
/// ## Recommended When
/// - Fair access across threads is more important than raw throughput
/// - Your target doesn't support 64-bit atomics
///
/// ## See Also
/// - [`BasicSnowflakeGenerator`]
/// - [`AtomicSnowflakeGenerator`]
///
/// [`BasicSnowflakeGenerator`]: crate::BasicSnowflakeGenerator
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
pub struct LockSnowflakeGenerator<T = MonotonicClock>
where
    T: TimeSource<u64>,
{
    #[cfg(feature = "cache-padded")]
    last: crossbeam_utils::CachePadded<Mutex<u64>>,
    #[cfg(not(feature = "cache-padded"))]
    last: Mutex<u64>,
    discriminator: Discriminator,
    time: T,
}

impl LockSnowflakeGenerator<MonotonicClock> {
    /// Creates a generator with a random discriminator and the default epoch.
    ///
    /// # Errors
    /// See [`GeneratorBuilder::build_lock`].
    pub fn try_default() -> Result<Self> {
        GeneratorBuilder::new().build_lock()
    }
}

impl<T> LockSnowflakeGenerator<T>
where
    T: TimeSource<u64>,
{
    /// Creates a new [`LockSnowflakeGenerator`] whose last issued timestamp is
    /// zero.
    ///
    /// # Example
    /// ```
    /// use flakelet::{Discriminator, LockSnowflakeGenerator, MonotonicClock};
    ///
    /// let generator = LockSnowflakeGenerator::new(
    ///     Discriminator::new(1).unwrap(),
    ///     MonotonicClock::try_default().unwrap(),
    /// );
    /// let token = generator.new_token().unwrap();
    /// assert!(!token.is_empty());
    /// ```
    pub fn new(discriminator: Discriminator, time: T) -> Self {
        Self::from_components(0, discriminator, time)
    }

    /// Creates a generator that resumes after `last_timestamp`.
    ///
    /// Values above [`MAX_TIMESTAMP`] are clamped, leaving the generator
    /// exhausted.
    pub fn from_components(last_timestamp: u64, discriminator: Discriminator, time: T) -> Self {
        let last = Mutex::new(last_timestamp.min(MAX_TIMESTAMP));
        Self {
            #[cfg(feature = "cache-padded")]
            last: crossbeam_utils::CachePadded::new(last),
            #[cfg(not(feature = "cache-padded"))]
            last,
            discriminator,
            time,
        }
    }

    pub const fn discriminator(&self) -> Discriminator {
        self.discriminator
    }

    /// Issues the next snowflake.
    ///
    /// # Errors
    /// - [`Error::LockPoisoned`](crate::Error::LockPoisoned) if another thread
    ///   panicked while holding the lock (std mutex only).
    /// - [`Error::TimestampOverflow`](crate::Error::TimestampOverflow) once
    ///   the counter is exhausted.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_snowflake(&self) -> Result<Snowflake> {
        #[cfg(feature = "parking-lot")]
        let mut last = self.last.lock();
        #[cfg(not(feature = "parking-lot"))]
        let mut last = self.last.lock()?;

        let next = advance(*last, self.time.current_millis())?;
        *last = next;
        Ok(Snowflake::from_parts_unchecked(next, self.discriminator))
    }

    /// Issues the next snowflake as a raw `u64`.
    ///
    /// # Errors
    /// See [`Self::next_snowflake`].
    pub fn next_timestamp(&self) -> Result<u64> {
        self.next_snowflake().map(Snowflake::to_raw)
    }

    /// Issues the next snowflake as a compact token.
    ///
    /// # Errors
    /// See [`Self::next_snowflake`].
    pub fn new_token(&self) -> Result<String> {
        self.next_snowflake().map(Snowflake::to_token)
    }
}

impl<T> SnowflakeGenerator for LockSnowflakeGenerator<T>
where
    T: TimeSource<u64>,
{
    fn discriminator(&self) -> Discriminator {
        self.discriminator()
    }

    fn next_snowflake(&self) -> Result<Snowflake> {
        self.next_snowflake()
    }
}
