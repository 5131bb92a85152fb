mod discriminator;
mod snowflake;

pub use discriminator::*;
pub use snowflake::*;
