//! Task-scoped snowflake generation for tokio.
//!
//! Instead of a hidden per-thread singleton, the caller builds a generator,
//! wraps it in an [`Arc`], and binds it to a task with [`scope`]. Everything
//! awaited inside the scope reaches that generator through the free functions
//! in this module, even when the runtime moves the task between worker
//! threads. Outside a scope they fail with [`Error::NoTaskGenerator`].
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use flakelet::{GeneratorBuilder, task};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let generator = Arc::new(GeneratorBuilder::new().discriminator(7).build_atomic().unwrap());
//!
//! let raw = task::scope(generator, async { task::next_timestamp().unwrap() }).await;
//! assert_eq!(raw & 0x3F, 7);
//!
//! assert!(task::new_token().is_err());
//! # }
//! ```

use std::{future::Future, sync::Arc};

use crate::{Error, Result, Snowflake, SnowflakeGenerator};

/// A generator that can be shared across tasks and threads.
pub type SharedGenerator = Arc<dyn SnowflakeGenerator + Send + Sync>;

tokio::task_local! {
    static TASK_GENERATOR: SharedGenerator;
}

/// Runs `future` with `generator` bound to the current task.
///
/// Scopes nest; the innermost binding wins.
pub async fn scope<F>(generator: SharedGenerator, future: F) -> F::Output
where
    F: Future,
{
    TASK_GENERATOR.scope(generator, future).await
}

/// Returns the generator bound to the current task.
///
/// # Errors
/// Returns [`Error::NoTaskGenerator`] outside of [`scope`].
pub fn current() -> Result<SharedGenerator> {
    TASK_GENERATOR
        .try_with(Arc::clone)
        .map_err(|_| Error::NoTaskGenerator)
}

/// Returns the next snowflake from the task's generator.
///
/// # Errors
/// Returns [`Error::NoTaskGenerator`] outside of [`scope`], or any error of
/// the bound generator.
pub fn next_snowflake() -> Result<Snowflake> {
    TASK_GENERATOR
        .try_with(|generator| generator.next_snowflake())
        .map_err(|_| Error::NoTaskGenerator)?
}

/// Returns the next raw value from the task's generator.
///
/// # Errors
/// See [`next_snowflake`].
pub fn next_timestamp() -> Result<u64> {
    next_snowflake().map(Snowflake::to_raw)
}

/// Returns a compact token from the task's generator.
///
/// # Errors
/// See [`next_snowflake`].
pub fn new_token() -> Result<String> {
    next_snowflake().map(Snowflake::to_token)
}
