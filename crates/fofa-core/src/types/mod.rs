mod account;
mod host;
mod search;
mod stats;

pub use account::*;
pub use host::*;
pub use search::*;
pub use stats::*;
