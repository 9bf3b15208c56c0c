mod config;
mod constants;
mod results;
mod stats;
mod workload;

pub use config::*;
pub use constants::*;
pub use results::*;
pub use stats::*;
pub use workload::*;
