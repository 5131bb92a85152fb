//! Console logging for the `flakelet` binary.
//!
//! Events go to stderr so that generated tokens on stdout stay pipeable. The
//! level is taken from `RUST_LOG` and defaults to `info`:
//!
//! ```bash
//! RUST_LOG=flakelet=trace flakelet generate -n 3
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_target(false),
        )
        .try_init()?;
    Ok(())
}
