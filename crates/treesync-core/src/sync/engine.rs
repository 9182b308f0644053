//! SyncEngine implementation

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use treesync_fs::{MetadataFile, NormalizedPath};

use crate::archive::Archiver;
use crate::config::{PathFilter, RunConfig, SyncMode};
use crate::diff::DiffEngine;
use crate::snapshot::{ScanOptions, Snapshot, SnapshotStore, walk};
use crate::{Error, Result};

use super::executor::Executor;
use super::{Confirm, LogTag, RunLog, SafetyWarning, SyncPlan, SyncReport};

/// Reconciles a source tree with a destination tree.
///
/// Construction validates the configuration, so an engine always holds
/// usable roots and a compiled filter.
#[derive(Debug)]
pub struct SyncEngine {
    config: RunConfig,
    filter: PathFilter,
    archiver: Archiver,
}

impl SyncEngine {
    /// Create a new SyncEngine
    ///
    /// The roots are replaced by their resolved absolute form, so metadata
    /// paths do not depend on the working directory.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found by [`RunConfig::validate`].
    pub fn new(mut config: RunConfig) -> Result<Self> {
        let filter = config.validate()?;
        (config.source, config.dest) = config.resolved_roots()?;
        let archiver = Archiver::from_config(&config);
        Ok(Self {
            config,
            filter,
            archiver,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Where this run's CSV log is written.
    pub fn log_path(&self) -> NormalizedPath {
        NormalizedPath::new(&self.config.source)
            .join(&self.config.metadata_dir)
            .join(MetadataFile::log_name(&self.config.run_timestamp))
    }

    fn store(&self, root: &Path) -> SnapshotStore {
        SnapshotStore::new(root, &self.config.metadata_dir)
    }

    fn scan_options(&self) -> ScanOptions {
        ScanOptions::new(self.config.crc_mode, self.config.ignored_dirs())
    }

    /// The snapshot persisted by the previous run, if incremental scanning is on.
    ///
    /// An unreadable snapshot is treated as missing.
    fn load_prior(&self, root: &Path) -> Option<Snapshot> {
        if !self.config.incremental {
            return None;
        }
        let store = self.store(root);
        match store.load(root, self.config.crc_mode, self.config.ignored_dirs()) {
            Ok(prior) => prior,
            Err(e) => {
                tracing::warn!(path = %store.path(), error = %e, "Ignoring unreadable snapshot");
                None
            }
        }
    }

    fn scan(&self, root: &Path, prior: Option<&Snapshot>) -> Snapshot {
        let options = self.scan_options();
        if !root.is_dir() {
            return Snapshot::new(root, options.crc_mode, options.ignored);
        }
        walk(root, &options, prior)
    }

    /// Scan both roots, check the destination against its last snapshot and diff.
    ///
    /// Nothing on disk is modified.
    pub fn plan(&self) -> Result<SyncPlan> {
        let config = &self.config;
        let mut log = RunLog::new();
        log_config(config, &mut log);

        tracing::debug!(source = %config.source.display(), "Scanning source");
        let prior_source = self.load_prior(&config.source);
        let mut source = self.scan(&config.source, prior_source.as_ref());

        tracing::debug!(dest = %config.dest.display(), "Scanning destination");
        let prior_dest = self.load_prior(&config.dest);
        let mut dest = self.scan(&config.dest, prior_dest.as_ref());

        for snapshot in [&source, &dest] {
            for issue in snapshot.scan_errors() {
                let path = snapshot.full_path(&issue.path);
                log.push(LogTag::ScanError, [path.display().to_string(), issue.message.clone()]);
            }
        }

        let mut warnings = Vec::new();
        if config.mode != SyncMode::Sync && prior_dest.is_some() && !dest.changes().is_empty() {
            let warning = SafetyWarning {
                root: config.dest.clone(),
                changes: dest.changes().len(),
            };
            tracing::warn!("{}", warning);
            log.push(LogTag::SafetyWarning, [warning.to_string()]);
            for change in dest.changes() {
                log.push(
                    LogTag::ChangedSinceScan,
                    [change.kind.as_str().to_string(), change.path.clone()],
                );
            }
            warnings.push(warning);
        }

        let diff = DiffEngine::new(config.detect_moves, &self.filter).compare(&mut source, &mut dest);
        for path in &diff.source_only {
            log.push(LogTag::SourceOnly, [path.as_str()]);
        }
        for path in &diff.dest_only {
            log.push(LogTag::DestOnly, [path.as_str()]);
        }
        for path in &diff.changed {
            log.push(LogTag::Changed, [path.as_str()]);
        }
        for pair in &diff.moved {
            log.push(LogTag::Moved, [pair.source.as_str(), pair.dest.as_str()]);
        }

        Ok(SyncPlan {
            source,
            dest,
            diff,
            warnings,
            log,
        })
    }

    /// Apply a confirmed plan, persist fresh snapshots and flush the log.
    ///
    /// # Errors
    ///
    /// Fails only when the destination root cannot be created. Per-file
    /// failures are collected in the report instead.
    pub fn execute(&self, plan: SyncPlan) -> Result<SyncReport> {
        let SyncPlan {
            source,
            dest,
            diff,
            mut log,
            ..
        } = plan;
        let config = &self.config;
        let mut report = SyncReport::completed(config.dry_run);

        if !config.dry_run && !config.dest.is_dir() {
            fs::create_dir_all(&config.dest)
                .map_err(|e| Error::operation("create destination", &config.dest, e))?;
        }

        log.push(LogTag::Start, [config.mode.as_str()]);
        tracing::debug!(mode = %config.mode, dry_run = config.dry_run, "Executing");
        let archiver = self.archiver.clone().with_kept_dirs(source.directories());
        let touched =
            Executor::new(config, &archiver, &mut log, &mut report).apply(&source, &dest, &diff);

        if !config.suppress_logging {
            if config.dry_run {
                self.persist(&source, &mut log, &mut report);
                self.persist(&dest, &mut log, &mut report);
            } else {
                let source = self.rescan(source, &touched.source);
                let dest = self.rescan(dest, &touched.dest);
                self.persist(&source, &mut log, &mut report);
                self.persist(&dest, &mut log, &mut report);
            }
        }

        log.push(LogTag::Completed, Vec::<String>::new());
        self.flush(&log, &mut report);
        tracing::debug!(actions = report.actions.len(), errors = report.errors.len(), "Run completed");
        Ok(report)
    }

    /// Record the rejection and flush the log without touching either tree.
    pub fn abort(&self, plan: SyncPlan) -> Result<SyncReport> {
        let mut log = plan.log;
        let mut report = SyncReport::aborted();
        log.push(LogTag::Aborted, Vec::<String>::new());
        self.flush(&log, &mut report);
        tracing::debug!("Run aborted");
        Ok(report)
    }

    /// Plan, ask `confirm`, then execute or abort.
    ///
    /// `auto_confirm` in the configuration skips the question.
    pub fn run(&self, confirm: &mut dyn Confirm) -> Result<SyncReport> {
        let plan = self.plan()?;
        if self.config.auto_confirm || confirm.confirm(&plan)? {
            self.execute(plan)
        } else {
            self.abort(plan)
        }
    }

    /// Walk the root of `planned` again, reusing its records except for `touched` paths.
    fn rescan(&self, mut planned: Snapshot, touched: &BTreeSet<String>) -> Snapshot {
        for path in touched {
            planned.remove(path);
        }
        walk(planned.root(), &self.scan_options(), Some(&planned))
    }

    /// Save `snapshot` into its own root. A root that does not exist is skipped.
    fn persist(&self, snapshot: &Snapshot, log: &mut RunLog, report: &mut SyncReport) {
        if !snapshot.root().is_dir() {
            return;
        }
        let store = self.store(snapshot.root());
        if let Err(e) = store.save(snapshot) {
            tracing::warn!(path = %store.path(), error = %e, "Could not save snapshot");
            report.errors.push(format!("save {}: {}", store.path(), e));
            log.push(LogTag::SaveError, [store.path().to_string(), e.to_string()]);
        }
    }

    fn flush(&self, log: &RunLog, report: &mut SyncReport) {
        if self.config.suppress_logging {
            return;
        }
        let path = self.log_path();
        match log.flush(&path) {
            Ok(()) => report.log_path = Some(path.to_native()),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Could not write run log");
                report.errors.push(format!("write log {}: {}", path, e));
            }
        }
    }
}

fn log_config(config: &RunConfig, log: &mut RunLog) {
    let settings = [
        ("source", config.source.display().to_string()),
        ("dest", config.dest.display().to_string()),
        ("mode", config.mode.to_string()),
        ("conflict", config.conflict.to_string()),
        ("crc", config.crc_mode.to_string()),
        ("detect moves", config.detect_moves.to_string()),
        ("archive", config.archive.to_string()),
        ("dry run", config.dry_run.to_string()),
        ("filters", config.filters.join(" ")),
    ];
    for (key, value) in settings {
        log.push(LogTag::Config, [key.to_string(), value]);
    }
}
