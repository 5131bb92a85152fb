use core::cmp;

use crate::{Discriminator, Error, MAX_TIMESTAMP, Result, Snowflake};

/// A minimal interface for generating snowflakes.
///
/// Every implementation guarantees that each value it returns is strictly
/// greater than every value it returned before, regardless of what its clock
/// reports. The trait is object safe so a generator can be shared as
/// `Arc<dyn SnowflakeGenerator + Send + Sync>`.
pub trait SnowflakeGenerator {
    /// The discriminator stamped into every value.
    fn discriminator(&self) -> Discriminator;

    /// Returns the next snowflake.
    ///
    /// # Errors
    /// Returns [`Error::TimestampOverflow`] once the 58-bit counter is
    /// exhausted, or an implementation-specific error such as
    /// [`Error::LockPoisoned`].
    fn next_snowflake(&self) -> Result<Snowflake>;

    /// Returns the next snowflake as `(timestamp << 6) | discriminator`.
    ///
    /// # Errors
    /// See [`Self::next_snowflake`].
    fn next_timestamp(&self) -> Result<u64> {
        self.next_snowflake().map(Snowflake::to_raw)
    }

    /// Returns the next snowflake rendered as a compact URL-safe token.
    ///
    /// # Errors
    /// See [`Self::next_snowflake`].
    fn new_token(&self) -> Result<String> {
        self.next_snowflake().map(Snowflake::to_token)
    }
}

/// Computes the timestamp that follows `last` given a clock reading of `now`.
///
/// The result is `max(now, last + 1)`: the clock wins when it has moved past
/// `last`, otherwise the counter advances by exactly one.
#[inline]
pub(crate) fn advance(last: u64, now: u64) -> Result<u64> {
    #[cfg(feature = "tracing")]
    if now < last {
        tracing::trace!(now, last, "clock behind last issued timestamp");
    }

    let next = cmp::max(now, last.saturating_add(1));
    if next > MAX_TIMESTAMP {
        return Err(cold_overflow(last));
    }
    Ok(next)
}

#[cold]
#[inline(never)]
fn cold_overflow(last: u64) -> Error {
    #[cfg(feature = "tracing")]
    tracing::error!(last, "timestamp counter exhausted");
    Error::TimestampOverflow { last }
}
