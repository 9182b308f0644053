//! Run orchestration
//!
//! A run is split into two phases joined by a confirmation gate:
//!
//! - **plan**: scan both roots, run the safety check, diff the snapshots
//! - **execute**: apply the mode's file operations, persist fresh
//!   snapshots and flush the run log
//!
//! [`SyncEngine::run`] chains the two through a [`Confirm`] implementation.

mod confirm;
mod engine;
mod executor;
mod log;
mod plan;
mod report;

pub use confirm::{AutoConfirm, Confirm, FixedAnswer};
pub use engine::SyncEngine;
pub use log::{LogEntry, LogTag, RunLog};
pub use plan::{SafetyWarning, SyncPlan};
pub use report::{RunStatus, SyncReport};
