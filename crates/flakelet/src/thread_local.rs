//! Thread-local snowflake generation.
//!
//! Each OS thread lazily creates its own [`BasicSnowflakeGenerator`] with a
//! random discriminator and the default epoch the first time it calls one of
//! these functions. Threads never contend with each other, but values from
//! different threads are only distinct when their discriminators or
//! timestamps differ. Use a shared [`AtomicSnowflakeGenerator`] when
//! uniqueness across threads matters.
//!
//! # Example
//! ```rust
//! let token = flakelet::new_token().unwrap();
//! let raw = flakelet::next_timestamp().unwrap();
//!
//! assert!(!token.is_empty());
//! assert_eq!(raw & 0x3F, u64::from(flakelet::thread_discriminator().unwrap().get()));
//! ```
//!
//! [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator

use std::cell::OnceCell;

use crate::{BasicSnowflakeGenerator, Discriminator, MonotonicClock, Result, Snowflake};

thread_local! {
    static THREAD_GENERATOR: OnceCell<BasicSnowflakeGenerator<MonotonicClock>> =
        const { OnceCell::new() };
}

/// Runs `f` with the calling thread's generator, creating it on first use.
///
/// A failed initialization leaves the slot empty, so the next call retries.
///
/// # Errors
/// Propagates any error from building the generator.
pub fn with_thread_generator<R>(
    f: impl FnOnce(&BasicSnowflakeGenerator<MonotonicClock>) -> R,
) -> Result<R> {
    THREAD_GENERATOR.with(|cell| {
        if let Some(generator) = cell.get() {
            return Ok(f(generator));
        }

        let generator = BasicSnowflakeGenerator::try_default()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            discriminator = generator.discriminator().get(),
            "initialized thread-local snowflake generator"
        );
        Ok(f(cell.get_or_init(|| generator)))
    })
}

/// Returns the next snowflake from the calling thread's generator.
///
/// # Errors
/// Returns an error if the generator could not be created or its counter is
/// exhausted.
pub fn next_snowflake() -> Result<Snowflake> {
    with_thread_generator(BasicSnowflakeGenerator::next_snowflake)?
}

/// Returns `(timestamp << 6) | discriminator` from the calling thread's
/// generator.
///
/// # Errors
/// See [`next_snowflake`].
pub fn next_timestamp() -> Result<u64> {
    next_snowflake().map(Snowflake::to_raw)
}

/// Returns a compact URL-safe token from the calling thread's generator.
///
/// # Errors
/// See [`next_snowflake`].
pub fn new_token() -> Result<String> {
    next_snowflake().map(Snowflake::to_token)
}

/// The discriminator of the calling thread's generator.
///
/// # Errors
/// Returns an error if the generator could not be created.
pub fn thread_discriminator() -> Result<Discriminator> {
    with_thread_generator(BasicSnowflakeGenerator::discriminator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn same_thread_reuses_one_generator() {
        let d = thread_discriminator().unwrap();
        let mut last = next_timestamp().unwrap();
        for _ in 0..10_000 {
            let v = next_timestamp().unwrap();
            assert!(v > last);
            assert_eq!(v & 0x3F, u64::from(d.get()));
            last = v;
        }
        assert_eq!(thread_discriminator().unwrap(), d);
    }

    #[test]
    fn tokens_decode_to_thread_values() {
        let token = new_token().unwrap();
        let id: Snowflake = token.parse().unwrap();
        assert_eq!(id.discriminator(), thread_discriminator().unwrap());
        assert!(next_snowflake().unwrap() > id);
    }

    #[test]
    fn each_thread_gets_its_own_generator() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                thread::spawn(|| {
                    let first = next_snowflake().unwrap();
                    let second = next_snowflake().unwrap();
                    assert!(second > first);
                    assert_eq!(first.discriminator(), second.discriminator());
                    (first, second)
                })
            })
            .collect();

        let mut values = HashSet::new();
        for handle in handles {
            let (first, second) = handle.join().unwrap();
            values.insert(first);
            values.insert(second);
        }
        // Independent instances rarely collide; at least most values differ.
        assert!(values.len() > 8);
    }
}
