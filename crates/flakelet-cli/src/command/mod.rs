mod decode;
mod generate;
mod stress;

use crate::config::{Action, GeneratorConfig};

pub fn run(config: &GeneratorConfig) -> anyhow::Result<()> {
    match &config.action {
        Action::Generate {
            count,
            interval,
            format,
        } => generate::run(config, *count, *interval, *format),
        Action::Decode { tokens } => decode::run(config, tokens),
        Action::Stress(stress) => stress::run(config, stress),
    }
}
