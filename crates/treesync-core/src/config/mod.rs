//! Run configuration
//!
//! - [`RunConfig`]: everything a single reconciliation run needs, validated up front
//! - [`SyncMode`], [`ConflictPolicy`], [`CrcMode`]: the policy knobs
//! - [`PathFilter`]: regex allow-list applied to relative paths

mod filter;
mod options;
mod run;

pub use filter::PathFilter;
pub use options::{ConflictPolicy, CrcMode, SyncMode};
pub use run::{RunConfig, default_timestamp};
