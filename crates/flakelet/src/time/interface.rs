use core::time::Duration;

/// Default epoch: Saturday, January 1, 2000 00:00:00 UTC, as an offset from
/// the Unix epoch.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(946_684_800_000);

/// A trait for time sources that return a monotonic or wall-clock timestamp.
///
/// This abstraction allows you to plug in a real system clock, a monotonic
/// timer, or a mocked time source in tests.
///
/// The unit is **milliseconds** relative to the source's epoch. A source may
/// move backwards; generators never issue a value at or below one they have
/// already issued.
///
/// # Example
///
/// ```
/// use flakelet::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> T;
}
