use crate::Result;

/// A trait for random sources that return random integers.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests.
///
/// # Example
/// ```
/// use flakelet::{RandSource, Result};
///
/// struct FixedRand;
/// impl RandSource<u8> for FixedRand {
///     fn try_rand(&self) -> Result<u8> {
///         Ok(42)
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.try_rand().unwrap(), 42);
/// ```
pub trait RandSource<T> {
    /// Returns a random integer.
    ///
    /// # Errors
    /// Returns [`Error::Entropy`](crate::Error::Entropy) if the source could
    /// not produce randomness.
    fn try_rand(&self) -> Result<T>;
}
