use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Discriminator, GeneratorBuilder, MAX_TIMESTAMP, MonotonicClock, Result, Snowflake,
    generator::{SnowflakeGenerator, advance},
    time::TimeSource,
};

/// A lock-free snowflake generator suitable for multi-threaded environments.
///
/// The last issued timestamp lives in an [`AtomicU64`] and is advanced with a
/// compare-and-swap loop, so concurrent callers are serialized without a lock.
/// A caller that loses the race re-reads the clock and retries; a lost race
/// always means another caller made progress.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Lock-free
///
/// ## Recommended When
/// - One instance is shared by many threads
/// - You want the lowest latency under contention
///
/// ## See Also
/// - [`BasicSnowflakeGenerator`]
/// - [`LockSnowflakeGenerator`]
///
/// [`BasicSnowflakeGenerator`]: crate::BasicSnowflakeGenerator
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
pub struct AtomicSnowflakeGenerator<T = MonotonicClock>
where
    T: TimeSource<u64>,
{
    #[cfg(feature = "cache-padded")]
    last: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    last: AtomicU64,
    discriminator: Discriminator,
    time: T,
}

impl AtomicSnowflakeGenerator<MonotonicClock> {
    /// Creates a generator with a random discriminator and the default epoch.
    ///
    /// # Errors
    /// See [`GeneratorBuilder::build_atomic`].
    pub fn try_default() -> Result<Self> {
        GeneratorBuilder::new().build_atomic()
    }
}

impl<T> AtomicSnowflakeGenerator<T>
where
    T: TimeSource<u64>,
{
    /// Creates a new [`AtomicSnowflakeGenerator`] whose last issued timestamp
    /// is zero.
    ///
    /// # Parameters
    ///
    /// - `discriminator`: stamped into the low six bits of every value.
    /// - `time`: A [`TimeSource`] implementation (e.g., [`MonotonicClock`])
    ///   that determines how timestamps are generated.
    ///
    /// # Example
    /// ```
    /// use flakelet::{AtomicSnowflakeGenerator, Discriminator, MonotonicClock};
    ///
    /// let generator = AtomicSnowflakeGenerator::new(
    ///     Discriminator::new(5).unwrap(),
    ///     MonotonicClock::try_default().unwrap(),
    /// );
    ///
    /// let a = generator.next_timestamp().unwrap();
    /// let b = generator.next_timestamp().unwrap();
    /// assert!(a < b);
    /// assert_eq!(b & 0x3F, 5);
    /// ```
    pub fn new(discriminator: Discriminator, time: T) -> Self {
        Self::from_components(0, discriminator, time)
    }

    /// Creates a generator that resumes after `last_timestamp`.
    ///
    /// Values above [`MAX_TIMESTAMP`] are clamped, leaving the generator
    /// exhausted.
    ///
    /// # ⚠️ Note
    /// In typical use cases, you should prefer [`Self::new`].
    pub fn from_components(last_timestamp: u64, discriminator: Discriminator, time: T) -> Self {
        let last = AtomicU64::new(last_timestamp.min(MAX_TIMESTAMP));
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

    /// The most recently issued millisecond timestamp, before shifting.
    pub fn last_timestamp(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }

    /// Issues the next snowflake.
    ///
    /// # Errors
    /// Returns [`Error::TimestampOverflow`](crate::Error::TimestampOverflow)
    /// once the counter cannot advance without touching the discriminator
    /// bits.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_snowflake(&self) -> Result<Snowflake> {
        let mut last = self.last.load(Ordering::Relaxed);

        loop {
            let next = advance(last, self.time.current_millis())?;

            match self
                .last
                .compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return Ok(Snowflake::from_parts_unchecked(next, self.discriminator)),
                // Another caller won the race. Retry against its value with a
                // fresh clock reading.
                Err(actual) => last = actual,
            }
        }
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

impl<T> SnowflakeGenerator for AtomicSnowflakeGenerator<T>
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
