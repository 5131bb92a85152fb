use anyhow::Context;
use flakelet::Snowflake;
use std::io::{self, Write};

use crate::config::GeneratorConfig;

/// One decoded token, relative to the configured epoch.
#[derive(Debug, PartialEq, Eq)]
struct Decoded {
    raw: u64,
    timestamp: u64,
    discriminator: u8,
    unix_ms: i128,
}

impl Decoded {
    fn new(token: &str, epoch_ms: i64) -> anyhow::Result<Self> {
        let id = Snowflake::from_token(token).with_context(|| format!("invalid token `{token}`"))?;
        Ok(Self {
            raw: id.to_raw(),
            timestamp: id.timestamp(),
            discriminator: id.discriminator().get(),
            unix_ms: i128::from(epoch_ms) + i128::from(id.timestamp()),
        })
    }
}

pub fn run(config: &GeneratorConfig, tokens: &[String]) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for token in tokens {
        let d = Decoded::new(token, config.epoch_ms)?;
        writeln!(
            out,
            "{token}\traw={}\ttimestamp={}\tdiscriminator={}\tunix_ms={}",
            d.raw, d.timestamp, d.discriminator, d.unix_ms
        )?;
    }
    out.flush()?;
    Ok(())
}
