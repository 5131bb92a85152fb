use core::time::Duration;

use super::{Instant, SystemTime, UNIX_EPOCH};
use crate::{DEFAULT_EPOCH, Error, MAX_TIMESTAMP, Result, TimeSource};

const NANOS_PER_MILLI: i128 = 1_000_000;

/// Converts a signed offset from the Unix epoch, in milliseconds, into a
/// [`SystemTime`]. Negative values name instants before 1970.
///
/// # Errors
/// Returns [`Error::EpochOutOfRange`] if the platform cannot represent the
/// instant.
pub fn epoch_from_unix_millis(millis: i64) -> Result<SystemTime> {
    let magnitude = Duration::from_millis(millis.unsigned_abs());
    let epoch = if millis >= 0 {
        UNIX_EPOCH.checked_add(magnitude)
    } else {
        UNIX_EPOCH.checked_sub(magnitude)
    };
    epoch.ok_or(Error::EpochOutOfRange)
}

/// A monotonic time source that returns elapsed time since construction,
/// offset from a user-defined epoch.
///
/// This avoids wall-clock adjustments (e.g., NTP or daylight savings changes)
/// while still aligning timestamps to a fixed origin.
///
/// The wall clock is read exactly once, at construction, to compute the signed
/// offset `now - epoch`. Every later reading adds the time measured by an
/// [`Instant`] started at the same moment, so changes to the system clock after
/// construction are never observed.
///
/// The epoch may lie in the future. Readings are clamped at zero until it has
/// passed.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    start: Instant,
    epoch: SystemTime,
    offset_nanos: i128,
}

impl MonotonicClock {
    /// Constructs a monotonic clock aligned to [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    /// See [`Self::with_epoch`].
    pub fn try_default() -> Result<Self> {
        let epoch = UNIX_EPOCH
            .checked_add(DEFAULT_EPOCH)
            .ok_or(Error::EpochOutOfRange)?;
        Self::with_epoch(epoch)
    }

    /// Constructs a monotonic clock using `epoch` as the origin (t = 0).
    ///
    /// # Errors
    /// Returns [`Error::EpochOutOfRange`] if the current time is more than
    /// [`MAX_TIMESTAMP`] milliseconds past `epoch`, since no snowflake could
    /// hold such a timestamp.
    ///
    /// # Example
    ///
    /// ```
    /// use flakelet::{MonotonicClock, TimeSource};
    /// use std::time::{Duration, SystemTime};
    ///
    /// let an_hour_ago = SystemTime::now() - Duration::from_secs(3600);
    /// let clock = MonotonicClock::with_epoch(an_hour_ago).unwrap();
    ///
    /// let ts: u64 = clock.current_millis();
    /// assert!(ts >= 3_600_000);
    /// ```
    pub fn with_epoch(epoch: SystemTime) -> Result<Self> {
        let start = Instant::now();
        let offset_nanos = match SystemTime::now().duration_since(epoch) {
            Ok(ahead) => nanos(ahead)?,
            Err(behind) => -nanos(behind.duration())?,
        };

        if offset_nanos.div_euclid(NANOS_PER_MILLI) > i128::from(MAX_TIMESTAMP) {
            return Err(Error::EpochOutOfRange);
        }

        Ok(Self::from_offset(start, epoch, offset_nanos))
    }

    pub(crate) const fn from_offset(start: Instant, epoch: SystemTime, offset_nanos: i128) -> Self {
        Self {
            start,
            epoch,
            offset_nanos,
        }
    }

    /// The origin this clock measures from.
    pub const fn epoch(&self) -> SystemTime {
        self.epoch
    }
}

fn nanos(duration: Duration) -> Result<i128> {
    i128::try_from(duration.as_nanos()).map_err(|_| Error::EpochOutOfRange)
}

impl TimeSource<u64> for MonotonicClock {
    /// Returns `floor(offset + elapsed)` in milliseconds, clamped at zero.
    fn current_millis(&self) -> u64 {
        let elapsed = i128::try_from(self.start.elapsed().as_nanos()).unwrap_or(i128::MAX);
        let millis = self
            .offset_nanos
            .saturating_add(elapsed)
            .div_euclid(NANOS_PER_MILLI);
        if millis <= 0 {
            0
        } else {
            u64::try_from(millis).unwrap_or(u64::MAX)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_epoch_is_year_2000() {
        let clock = MonotonicClock::try_default().unwrap();
        assert_eq!(
            clock.epoch().duration_since(UNIX_EPOCH).unwrap(),
            Duration::from_secs(946_684_800)
        );
        // Any time after 2024 is more than 24 years of milliseconds.
        assert!(clock.current_millis() > 24 * 365 * 24 * 3_600_000);
    }

    #[test]
    fn tracks_elapsed_time() {
        let clock = MonotonicClock::with_epoch(SystemTime::now()).unwrap();
        let before = clock.current_millis();
        std::thread::sleep(Duration::from_millis(20));
        let after = clock.current_millis();
        assert!(after >= before + 20, "before {before}, after {after}");
    }

    #[test]
    fn never_moves_backwards() {
        let clock = MonotonicClock::try_default().unwrap();
        let mut last = clock.current_millis();
        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn future_epoch_clamps_to_zero() {
        let epoch = SystemTime::now() + Duration::from_secs(3600);
        let clock = MonotonicClock::with_epoch(epoch).unwrap();
        assert_eq!(clock.current_millis(), 0);
    }

    #[test]
    fn floors_partial_milliseconds() {
        let start = Instant::now();
        let clock = MonotonicClock::from_offset(start, UNIX_EPOCH, 1_999_999);
        assert!(clock.current_millis() >= 1);

        let clock = MonotonicClock::from_offset(start, UNIX_EPOCH, -1_000_000_000);
        assert_eq!(clock.current_millis(), 0);
    }

    #[test]
    fn ancient_epoch_is_supported() {
        // Year 1 AD is about 62 billion seconds before 1970.
        let epoch = epoch_from_unix_millis(-62_135_596_800_000).unwrap();
        let clock = MonotonicClock::with_epoch(epoch).unwrap();
        assert!(clock.current_millis() > 62_135_596_800_000);
    }

    #[test]
    fn epoch_from_unix_millis_handles_sign() {
        assert_eq!(epoch_from_unix_millis(0).unwrap(), UNIX_EPOCH);
        assert_eq!(
            epoch_from_unix_millis(1_500).unwrap(),
            UNIX_EPOCH + Duration::from_millis(1_500)
        );
        assert_eq!(
            epoch_from_unix_millis(-1_500).unwrap(),
            UNIX_EPOCH - Duration::from_millis(1_500)
        );
    }
}
