mod atomic;
mod basic;
mod builder;
mod interface;
mod lock;
mod mutex;

pub use atomic::*;
pub use basic::*;
pub use builder::*;
pub use interface::*;
pub use lock::*;
pub(crate) use mutex::*;
