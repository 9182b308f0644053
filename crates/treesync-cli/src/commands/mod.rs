//! Command implementations

mod config;
mod run;
mod stats;

pub use config::{build_config, load_config, save_config};
pub use run::run_sync;
pub use stats::run_stats;
