//! Reconciliation engine for treesync
//!
//! This crate implements the full scan → diff → execute pipeline:
//!
//! - **Snapshots**: incremental directory walks producing path → metadata manifests
//! - **Diffing**: set difference of two snapshots plus rename detection
//! - **Archiving**: files about to be lost are moved into a timestamped side folder
//! - **SyncEngine**: plans a run, waits for confirmation, applies mirror/backup/sync semantics
//!
//! # Architecture
//!
//! ```text
//!                 treesync-cli
//!                      |
//!                treesync-core
//!     +--------+-------+-------+---------+
//!     |        |       |       |         |
//!  config  snapshot  diff  archive     sync
//!                      |
//!                 treesync-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use treesync_core::{AutoConfirm, RunConfig, SyncEngine};
//!
//! fn example() -> treesync_core::Result<()> {
//!     let config = RunConfig::new("/data/photos", "/backup/photos");
//!     let engine = SyncEngine::new(config)?;
//!     let report = engine.run(&mut AutoConfirm)?;
//!     println!("{}", report.status);
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod config;
pub mod diff;
pub mod error;
pub mod snapshot;
pub mod sync;

pub use archive::Archiver;
pub use config::{ConflictPolicy, CrcMode, PathFilter, RunConfig, SyncMode};
pub use diff::{DiffEngine, DiffResult, MovedPair, records_match};
pub use error::{Error, Result};
pub use snapshot::{
    ChangeKind, FileRecord, ScanIssue, ScanOptions, Snapshot, SnapshotChange, SnapshotStore,
    TreeStats, walk,
};
pub use sync::{
    AutoConfirm, Confirm, FixedAnswer, LogEntry, LogTag, RunLog, RunStatus, SafetyWarning,
    SyncEngine, SyncPlan, SyncReport,
};
