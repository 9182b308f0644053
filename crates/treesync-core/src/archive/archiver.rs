use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use treesync_fs::NormalizedPath;

use crate::config::RunConfig;

/// Moves files that are about to be lost into a per-run side directory.
#[derive(Debug, Clone)]
pub struct Archiver {
    archive_dir: String,
    timestamp: String,
    enabled: bool,
    cleanup: bool,
    /// Relative directories never pruned, even when left empty
    kept: BTreeSet<String>,
}

impl Archiver {
    /// Create an enabled archiver with empty-parent cleanup turned on.
    pub fn new(archive_dir: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            archive_dir: archive_dir.into(),
            timestamp: timestamp.into(),
            enabled: true,
            cleanup: true,
            kept: BTreeSet::new(),
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.archive_dir.clone(), config.run_timestamp.clone())
            .with_enabled(config.archive)
            .with_cleanup(config.cleanup_empty_dirs)
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Directories that must survive pruning, such as those of the source tree.
    pub fn with_kept_dirs(mut self, kept: BTreeSet<String>) -> Self {
        self.kept = kept;
        self
    }

    /// Whether `rel` is a directory that must not be removed.
    pub fn keeps(&self, rel: &str) -> bool {
        self.kept.contains(rel)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Where `rel` under `root` lands when archived during this run.
    pub fn archive_path(&self, root: &Path, rel: &str) -> PathBuf {
        let relative = NormalizedPath::new(&self.archive_dir)
            .join(&self.timestamp)
            .join(rel);
        root.join(relative.to_native())
    }

    /// Move `root/rel` into the archive.
    ///
    /// Returns the archived location, or `None` when archiving is disabled
    /// (the file is left untouched in that case). Parents emptied by the
    /// move are pruned when cleanup is on.
    pub fn archive(&self, root: &Path, rel: &str) -> io::Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }
        let from = root.join(NormalizedPath::new(rel).to_native());
        let to = self.archive_path(root, rel);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&from, &to)?;
        tracing::debug!(from = %from.display(), to = %to.display(), "Archived");

        self.prune(root, rel)?;
        Ok(Some(to))
    }

    /// Copy `root/rel` into the archive, leaving the original in place.
    pub fn preserve(&self, root: &Path, rel: &str) -> io::Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }
        let from = root.join(NormalizedPath::new(rel).to_native());
        let to = self.archive_path(root, rel);
        if from.is_dir() {
            fs::create_dir_all(&to)?;
        } else {
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&from, &to)?;
        }
        tracing::debug!(from = %from.display(), to = %to.display(), "Preserved");
        Ok(Some(to))
    }

    /// Delete `root/rel` outright, then prune emptied parents when cleanup is on.
    pub fn remove(&self, root: &Path, rel: &str) -> io::Result<()> {
        let path = root.join(NormalizedPath::new(rel).to_native());
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        self.prune(root, rel)?;
        Ok(())
    }

    /// Prune the parents `rel` left empty, when cleanup is on.
    pub fn prune(&self, root: &Path, rel: &str) -> io::Result<usize> {
        if !self.cleanup {
            return Ok(0);
        }
        prune_empty_parents(root, rel, &self.kept)
    }
}

/// Remove the now-empty ancestors of `rel`, innermost first.
///
/// Stops at the first directory that still has entries or is listed in
/// `kept`, and never removes `root` itself. Returns how many directories
/// were removed.
fn prune_empty_parents(root: &Path, rel: &str, kept: &BTreeSet<String>) -> io::Result<usize> {
    let mut removed = 0;
    let mut current = NormalizedPath::new(rel).parent();
    while let Some(dir) = current {
        if kept.contains(dir.as_str()) {
            break;
        }
        let full = root.join(dir.to_native());
        let is_empty = match fs::read_dir(&full) {
            Ok(mut entries) => entries.next().is_none(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                current = dir.parent();
                continue;
            }
            Err(e) => return Err(e),
        };
        if !is_empty {
            break;
        }
        fs::remove_dir(&full)?;
        tracing::debug!(path = %full.display(), "Pruned empty directory");
        removed += 1;
        current = dir.parent();
    }
    Ok(removed)
}
