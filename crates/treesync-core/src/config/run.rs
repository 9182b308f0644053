//! The per-run configuration record

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use treesync_fs::{DEFAULT_METADATA_DIR, validate_dir_name};

use super::{ConflictPolicy, CrcMode, PathFilter, SyncMode};
use crate::{Error, Result};

/// Format of the default run timestamp (`yymmdd-HHMM`, local time)
const TIMESTAMP_FORMAT: &str = "%y%m%d-%H%M";

/// Timestamp naming this run's archive folder and log file.
pub fn default_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Everything a single reconciliation run needs.
///
/// Missing fields fall back to [`RunConfig::default`] when deserialized, so a
/// saved config stays loadable as options are added. The run timestamp is
/// never persisted; a loaded config always gets a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Root treated as the authoritative side
    pub source: PathBuf,
    /// Root being brought in line with the source
    pub dest: PathBuf,
    pub mode: SyncMode,
    pub conflict: ConflictPolicy,
    pub crc_mode: CrcMode,
    /// Pair one-sided files with matching records as renames
    pub detect_moves: bool,
    /// Move files about to be lost into the archive folder instead of deleting them
    pub archive: bool,
    pub archive_dir: String,
    pub metadata_dir: String,
    /// Remove directories left empty by a removal or move
    pub cleanup_empty_dirs: bool,
    /// Skip the confirmation gate
    pub auto_confirm: bool,
    /// Log intended actions without touching either tree
    pub dry_run: bool,
    /// Regex allow-list; empty means every path
    pub filters: Vec<String>,
    #[serde(skip, default = "default_timestamp")]
    pub run_timestamp: String,
    /// Write neither the CSV log nor the snapshots
    pub suppress_logging: bool,
    /// Reuse persisted snapshots to skip unchanged files
    pub incremental: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            dest: PathBuf::new(),
            mode: SyncMode::default(),
            conflict: ConflictPolicy::default(),
            crc_mode: CrcMode::default(),
            detect_moves: false,
            archive: true,
            archive_dir: DEFAULT_METADATA_DIR.to_string(),
            metadata_dir: DEFAULT_METADATA_DIR.to_string(),
            cleanup_empty_dirs: true,
            auto_confirm: false,
            dry_run: false,
            filters: Vec::new(),
            run_timestamp: default_timestamp(),
            suppress_logging: false,
            incremental: true,
        }
    }
}

impl RunConfig {
    /// Create a config for the given roots with default options.
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            ..Self::default()
        }
    }

    /// Folder names pruned from every walk.
    ///
    /// A fresh list is built on every call.
    pub fn ignored_dirs(&self) -> Vec<String> {
        let mut ignored = vec![self.archive_dir.clone()];
        if self.metadata_dir != self.archive_dir {
            ignored.push(self.metadata_dir.clone());
        }
        ignored
    }

    /// Check the configuration and compile its path filter.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRoot`] when the source is not a directory, the
    ///   destination exists but is not a directory, or one root lies inside
    ///   the other
    /// - [`Error::InvalidConfig`] for unusable folder names or timestamp
    /// - [`Error::InvalidFilter`] for a pattern that does not compile
    pub fn validate(&self) -> Result<PathFilter> {
        if self.source.as_os_str().is_empty() {
            return Err(Error::config("source directory not provided"));
        }
        if self.dest.as_os_str().is_empty() {
            return Err(Error::config("destination directory not provided"));
        }
        if !self.source.is_dir() {
            return Err(Error::InvalidRoot {
                path: self.source.clone(),
                reason: "source directory does not exist".to_string(),
            });
        }
        if self.dest.exists() && !self.dest.is_dir() {
            return Err(Error::InvalidRoot {
                path: self.dest.clone(),
                reason: "destination exists but is not a directory".to_string(),
            });
        }

        let (source, dest) = self.resolved_roots()?;
        if source == dest {
            return Err(Error::InvalidRoot {
                path: self.dest.clone(),
                reason: "source and destination are the same directory".to_string(),
            });
        }
        if dest.starts_with(&source) || source.starts_with(&dest) {
            return Err(Error::InvalidRoot {
                path: self.dest.clone(),
                reason: "source and destination must not be nested in each other".to_string(),
            });
        }

        validate_dir_name(&self.archive_dir, "Archive dir").map_err(Error::config)?;
        validate_dir_name(&self.metadata_dir, "Metadata dir").map_err(Error::config)?;
        validate_dir_name(&self.run_timestamp, "Run timestamp").map_err(Error::config)?;

        PathFilter::new(&self.filters)
    }
}

impl RunConfig {
    /// Absolute, symlink-free source and destination roots.
    pub fn resolved_roots(&self) -> Result<(PathBuf, PathBuf)> {
        Ok((resolve(&self.source)?, resolve(&self.dest)?))
    }
}

/// Absolute, symlink-free form of a root that may not exist yet.
fn resolve(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(dunce::canonicalize(path)?);
    }
    let absolute = std::path::absolute(path)?;
    // Canonicalize the deepest existing ancestor so symlinked parents compare equal
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(absolute),
        }
    }
    let mut resolved = dunce::canonicalize(existing)?;
    for name in missing.iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn roots() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        let dest = temp.path().join("dest");
        fs::create_dir_all(&source).unwrap();
        (temp, source, dest)
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.mode, SyncMode::Mirror);
        assert_eq!(config.conflict, ConflictPolicy::Source);
        assert_eq!(config.crc_mode, CrcMode::None);
        assert!(config.archive);
        assert!(config.cleanup_empty_dirs);
        assert!(config.incremental);
        assert_eq!(config.metadata_dir, ".treesync");
        assert_eq!(config.run_timestamp.len(), "yymmdd-HHMM".len());
    }

    #[test]
    fn test_ignored_dirs_deduplicates() {
        let mut config = RunConfig::default();
        assert_eq!(config.ignored_dirs(), vec![".treesync".to_string()]);

        config.archive_dir = "archive".to_string();
        assert_eq!(
            config.ignored_dirs(),
            vec!["archive".to_string(), ".treesync".to_string()]
        );
    }

    #[test]
    fn test_validate_accepts_missing_dest() {
        let (_temp, source, dest) = roots();
        let config = RunConfig::new(&source, &dest);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_source() {
        let (temp, _source, dest) = roots();
        let config = RunConfig::new(temp.path().join("nope"), dest);
        assert!(matches!(config.validate(), Err(Error::InvalidRoot { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_dest() {
        let (_temp, source, _dest) = roots();
        let config = RunConfig::new(&source, "");
        assert!(matches!(config.validate(), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_validate_rejects_same_root() {
        let (_temp, source, _dest) = roots();
        let config = RunConfig::new(&source, &source);
        assert!(matches!(config.validate(), Err(Error::InvalidRoot { .. })));
    }

    #[test]
    fn test_validate_rejects_nested_roots() {
        let (_temp, source, _dest) = roots();
        let config = RunConfig::new(&source, source.join("backup"));
        assert!(matches!(config.validate(), Err(Error::InvalidRoot { .. })));
    }

    #[test]
    fn test_validate_rejects_dest_file() {
        let (_temp, source, dest) = roots();
        fs::write(&dest, "not a dir").unwrap();
        let config = RunConfig::new(&source, &dest);
        assert!(matches!(config.validate(), Err(Error::InvalidRoot { .. })));
    }

    #[test]
    fn test_validate_rejects_path_like_archive_dir() {
        let (_temp, source, dest) = roots();
        let mut config = RunConfig::new(&source, &dest);
        config.archive_dir = "../elsewhere".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_validate_compiles_filters() {
        let (_temp, source, dest) = roots();
        let mut config = RunConfig::new(&source, &dest);
        config.filters = vec!["docs/".to_string()];
        let filter = config.validate().unwrap();
        assert!(filter.allows("docs/a.md"));
        assert!(!filter.allows("src/a.rs"));

        config.filters = vec!["[".to_string()];
        assert!(matches!(config.validate(), Err(Error::InvalidFilter { .. })));
    }

    #[test]
    fn test_timestamp_is_not_serialized() {
        let mut config = RunConfig::new("/a", "/b");
        config.run_timestamp = "fixed".to_string();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("fixed"));

        let loaded: RunConfig = serde_json::from_str(&json).unwrap();
        assert_ne!(loaded.run_timestamp, "fixed");
        assert_eq!(loaded.source, PathBuf::from("/a"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let loaded: RunConfig =
            serde_json::from_str(r#"{"source": "/a", "dest": "/b", "mode": "sync"}"#).unwrap();
        assert_eq!(loaded.mode, SyncMode::Sync);
        assert!(loaded.archive);
        assert_eq!(loaded.conflict, ConflictPolicy::Source);
    }
}
