use core::cell::Cell;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Discriminator, GeneratorBuilder, MAX_TIMESTAMP, MonotonicClock, Result, Snowflake,
    generator::{SnowflakeGenerator, advance},
    time::TimeSource,
};

/// A non-concurrent snowflake generator suitable for single-threaded
/// environments.
///
/// This generator is lightweight and fast, but **not thread-safe**: the
/// counter is a plain [`Cell`], so the type is `!Sync` and the compiler keeps
/// it on one thread. The thread-local facade hands out one of these per
/// thread.
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ No atomic or lock overhead
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
/// - [`AtomicSnowflakeGenerator`]
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
pub struct BasicSnowflakeGenerator<T = MonotonicClock>
where
    T: TimeSource<u64>,
{
    last: Cell<u64>,
    discriminator: Discriminator,
    time: T,
}

impl BasicSnowflakeGenerator<MonotonicClock> {
    /// Creates a generator with a random discriminator and the default epoch.
    ///
    /// # Errors
    /// See [`GeneratorBuilder::build_basic`].
    pub fn try_default() -> Result<Self> {
        GeneratorBuilder::new().build_basic()
    }
}

impl<T> BasicSnowflakeGenerator<T>
where
    T: TimeSource<u64>,
{
    /// Creates a new [`BasicSnowflakeGenerator`] whose last issued timestamp
    /// is zero.
    pub fn new(discriminator: Discriminator, time: T) -> Self {
        Self::from_components(0, discriminator, time)
    }

    /// Creates a generator that resumes after `last_timestamp`, clamped to
    /// [`MAX_TIMESTAMP`].
    pub fn from_components(last_timestamp: u64, discriminator: Discriminator, time: T) -> Self {
        Self {
            last: Cell::new(last_timestamp.min(MAX_TIMESTAMP)),
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
    /// Returns [`Error::TimestampOverflow`](crate::Error::TimestampOverflow)
    /// once the counter is exhausted.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_snowflake(&self) -> Result<Snowflake> {
        let next = advance(self.last.get(), self.time.current_millis())?;
        self.last.set(next);
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

impl<T> SnowflakeGenerator for BasicSnowflakeGenerator<T>
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
