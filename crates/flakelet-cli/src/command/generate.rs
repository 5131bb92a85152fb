use anyhow::Context;
use flakelet::Snowflake;
use std::{
    io::{self, Write},
    thread,
    time::Duration,
};

use crate::config::{Format, GeneratorConfig};

pub fn run(
    config: &GeneratorConfig,
    count: u64,
    interval: Duration,
    format: Format,
) -> anyhow::Result<()> {
    let generator = config
        .builder()
        .build_atomic()
        .context("failed to create generator")?;

    tracing::info!(
        discriminator = generator.discriminator().get(),
        epoch_ms = config.epoch_ms,
        count,
        "generating snowflakes"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for i in 0..count {
        if i > 0 && !interval.is_zero() {
            out.flush()?;
            thread::sleep(interval);
        }
        let id = generator.next_snowflake()?;
        writeln!(out, "{}", render(id, format))?;
    }
    out.flush()?;
    Ok(())
}

fn render(id: Snowflake, format: Format) -> String {
    match format {
        Format::Token => id.to_token(),
        Format::Fixed => id.to_fixed_token(),
        Format::Timestamp => id.to_raw().to_string(),
    }
}
