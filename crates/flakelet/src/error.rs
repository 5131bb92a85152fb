/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `flakelet` can emit.
///
/// Only [`Error::InvalidDiscriminator`] is caused by caller input at
/// construction. The remaining variants report an environment the generator
/// cannot work in (no entropy, an unrepresentable epoch, an exhausted counter)
/// or a token that does not decode.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The discriminator is outside `[0, 63]`.
    #[error("discriminator must be in the range [0, 63], got {value}")]
    InvalidDiscriminator {
        /// The rejected value.
        value: i64,
    },

    /// The epoch cannot be represented, or the current time lies further past
    /// it than the 58-bit timestamp field can hold.
    #[error("epoch is out of range for a 58-bit millisecond timestamp")]
    EpochOutOfRange,

    /// The millisecond counter would exceed [`MAX_TIMESTAMP`] and spill into
    /// the discriminator bits.
    ///
    /// [`MAX_TIMESTAMP`]: crate::MAX_TIMESTAMP
    #[error("timestamp counter exhausted (last issued {last})")]
    TimestampOverflow {
        /// The last timestamp the generator issued.
        last: u64,
    },

    /// The operating system random source failed.
    #[error("secure random source failed: {0}")]
    Entropy(String),

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is never produced.
    #[error("generator lock poisoned")]
    LockPoisoned,

    /// The token is not valid unpadded URL-safe base64.
    #[error("invalid token: {0}")]
    TokenDecode(#[from] base64::DecodeError),

    /// The token decodes to zero bytes or to more than eight bytes.
    #[error("invalid token length: {len} bytes")]
    TokenLength {
        /// Number of decoded bytes.
        len: usize,
    },

    /// A task-scoped generator was requested outside of
    /// [`task::scope`](crate::task::scope).
    #[cfg_attr(docsrs, doc(cfg(feature = "async-tokio")))]
    #[cfg(feature = "async-tokio")]
    #[error("no generator is bound to the current task")]
    NoTaskGenerator,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
