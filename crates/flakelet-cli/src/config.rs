use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use flakelet::{DEFAULT_EPOCH, Discriminator, GeneratorBuilder, epoch_from_unix_millis};
use std::time::{Duration, SystemTime};

/// Default seen-set size at which the stress harness starts over.
pub const DEFAULT_PRUNE_THRESHOLD: usize = 10_000_000;

/// Command-line interface for the `flakelet` binary.
///
/// The generator settings are global and may also be supplied through the
/// environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakelet",
    version,
    about = "Generate, decode and stress-test short URL-safe snowflake tokens"
)]
pub struct CliArgs {
    /// Discriminator stamped into the low six bits, in `[0, 63]`.
    ///
    /// A random one is drawn from the OS when omitted.
    ///
    /// Environment variable: `FLAKELET_DISCRIMINATOR`
    #[arg(long, global = true, env = "FLAKELET_DISCRIMINATOR")]
    pub discriminator: Option<i64>,

    /// Epoch as milliseconds since the Unix epoch. Negative values are
    /// allowed. Defaults to 2000-01-01T00:00:00Z.
    ///
    /// Environment variable: `FLAKELET_EPOCH_MS`
    #[arg(
        long,
        global = true,
        env = "FLAKELET_EPOCH_MS",
        allow_negative_numbers = true
    )]
    pub epoch_ms: Option<i64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print freshly generated snowflakes, one per line.
    Generate {
        /// How many to print.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u64,

        /// Pause between consecutive snowflakes.
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,

        #[arg(long, value_enum, default_value_t = Format::Token)]
        format: Format,
    },

    /// Break tokens down into their raw value, timestamp and discriminator.
    Decode {
        #[arg(required = true)]
        tokens: Vec<String>,
    },

    /// Hammer a generator from many threads and report duplicates.
    Stress {
        /// Worker threads. Defaults to the number of logical CPUs.
        #[arg(long)]
        threads: Option<usize>,

        #[arg(long, default_value_t = 5)]
        duration_secs: u64,

        #[arg(long, value_enum, default_value_t = Mode::Shared)]
        mode: Mode,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Compact token with leading zero bytes trimmed.
    Token,
    /// Fixed-width, 11 character token.
    Fixed,
    /// Raw `(timestamp << 6) | discriminator` integer.
    Timestamp,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// All threads share one lock-free generator.
    Shared,
    /// Each thread uses its own thread-local generator.
    ThreadLocal,
}

/// Validated settings for a single invocation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub discriminator: Option<Discriminator>,
    pub epoch: SystemTime,
    pub epoch_ms: i64,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Generate {
        count: u64,
        interval: Duration,
        format: Format,
    },
    Decode {
        tokens: Vec<String>,
    },
    Stress(StressConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressConfig {
    pub threads: usize,
    pub duration: Duration,
    pub mode: Mode,
    pub prune_threshold: usize,
}

impl GeneratorConfig {
    /// A builder carrying the configured discriminator and epoch.
    pub fn builder(&self) -> GeneratorBuilder {
        let builder = GeneratorBuilder::new().epoch(self.epoch);
        match self.discriminator {
            Some(d) => builder.discriminator(d.get()),
            None => builder,
        }
    }
}

impl TryFrom<CliArgs> for GeneratorConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let discriminator = args
            .discriminator
            .map(|value| {
                Discriminator::try_from(value)
                    .with_context(|| "FLAKELET_DISCRIMINATOR is out of range")
            })
            .transpose()?;

        let epoch_ms = match args.epoch_ms {
            Some(ms) => ms,
            None => i64::try_from(DEFAULT_EPOCH.as_millis())
                .context("default epoch does not fit in i64 milliseconds")?,
        };
        let epoch = epoch_from_unix_millis(epoch_ms)
            .with_context(|| format!("FLAKELET_EPOCH_MS ({epoch_ms}) is not representable"))?;

        let action = match args.command {
            Command::Generate {
                count,
                interval_ms,
                format,
            } => {
                if count == 0 {
                    bail!("--count must be greater than 0");
                }
                Action::Generate {
                    count,
                    interval: Duration::from_millis(interval_ms),
                    format,
                }
            }
            Command::Decode { tokens } => Action::Decode { tokens },
            Command::Stress {
                threads,
                duration_secs,
                mode,
            } => {
                let threads = threads.unwrap_or_else(num_cpus::get);
                if threads == 0 {
                    bail!("--threads must be greater than 0");
                }
                if duration_secs == 0 {
                    bail!("--duration-secs must be greater than 0");
                }
                Action::Stress(StressConfig {
                    threads,
                    duration: Duration::from_secs(duration_secs),
                    mode,
                    prune_threshold: DEFAULT_PRUNE_THRESHOLD,
                })
            }
        };

        Ok(Self {
            discriminator,
            epoch,
            epoch_ms,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn parse(args: &[&str]) -> anyhow::Result<GeneratorConfig> {
        let args = CliArgs::try_parse_from(args)?;
        GeneratorConfig::try_from(args)
    }

    #[test]
    fn generate_defaults() {
        let config = parse(&["flakelet", "--epoch-ms", "0", "generate"]).unwrap();
        assert_eq!(config.epoch, UNIX_EPOCH);
        assert_eq!(
            config.action,
            Action::Generate {
                count: 1,
                interval: Duration::ZERO,
                format: Format::Token,
            }
        );
    }

    #[test]
    fn global_options_after_subcommand() {
        let config = parse(&[
            "flakelet",
            "generate",
            "-n",
            "3",
            "--format",
            "fixed",
            "--discriminator",
            "5",
        ])
        .unwrap();
        assert_eq!(config.discriminator.map(Discriminator::get), Some(5));
        assert!(matches!(
            config.action,
            Action::Generate {
                count: 3,
                format: Format::Fixed,
                ..
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_discriminator() {
        for value in ["64", "-1"] {
            let err = parse(&["flakelet", "--discriminator", value, "generate"]).unwrap_err();
            assert!(err.to_string().contains("FLAKELET_DISCRIMINATOR"), "{err}");
        }
    }

    #[test]
    fn negative_epoch_is_before_1970() {
        let config = parse(&["flakelet", "--epoch-ms", "-86400000", "decode", "AQ"]).unwrap();
        assert_eq!(config.epoch_ms, -86_400_000);
        assert_eq!(
            UNIX_EPOCH.duration_since(config.epoch).unwrap(),
            Duration::from_secs(86_400)
        );
    }

    #[test]
    fn decode_requires_a_token() {
        assert!(CliArgs::try_parse_from(["flakelet", "decode"]).is_err());
    }

    #[test]
    fn stress_validation() {
        let config = parse(&[
            "flakelet",
            "stress",
            "--threads",
            "4",
            "--duration-secs",
            "1",
            "--mode",
            "thread-local",
        ])
        .unwrap();
        assert_eq!(
            config.action,
            Action::Stress(StressConfig {
                threads: 4,
                duration: Duration::from_secs(1),
                mode: Mode::ThreadLocal,
                prune_threshold: DEFAULT_PRUNE_THRESHOLD,
            })
        );

        assert!(parse(&["flakelet", "stress", "--threads", "0"]).is_err());
        assert!(parse(&["flakelet", "stress", "--duration-secs", "0"]).is_err());
        assert!(parse(&["flakelet", "generate", "--count", "0"]).is_err());
    }

    #[test]
    fn builder_uses_configured_discriminator() {
        let config = parse(&["flakelet", "--discriminator", "9", "generate"]).unwrap();
        let generator = config.builder().build_atomic().unwrap();
        assert_eq!(generator.discriminator().get(), 9);
    }
}
