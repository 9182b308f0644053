//! Building, saving and loading the run configuration

use std::path::{Path, PathBuf};

use colored::Colorize;
use treesync_core::RunConfig;
use treesync_fs::{ConfigStore, MetadataFile, NormalizedPath};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Where `--save` writes and `--load` reads the configuration.
pub fn config_path(source: &Path, metadata_dir: &str) -> NormalizedPath {
    NormalizedPath::new(source)
        .join(metadata_dir)
        .join(MetadataFile::Config.as_str())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

/// Translate command-line options into a [`RunConfig`].
pub fn build_config(cli: &Cli) -> Result<RunConfig> {
    let dest = cli
        .dest
        .as_deref()
        .ok_or_else(|| CliError::user("destination directory not provided"))?;

    let mut config = RunConfig::new(absolute(&cli.source)?, absolute(dest)?);
    config.mode = cli.mode;
    config.conflict = cli.conflict;
    config.crc_mode = cli.crc_mode;
    config.detect_moves = cli.detect_moves;
    config.archive = !cli.no_archive;
    config.archive_dir = cli.archive_dir.clone();
    config.metadata_dir = cli.metadata_dir.clone();
    config.cleanup_empty_dirs = !cli.no_cleanup;
    config.auto_confirm = cli.yes;
    config.dry_run = cli.dry_run;
    config.filters = cli.filters.clone();
    config.suppress_logging = cli.suppress;
    config.incremental = !cli.no_incremental;
    if let Some(timestamp) = &cli.timestamp {
        config.run_timestamp = timestamp.clone();
    }
    Ok(config)
}

/// Persist `config` and return without running.
pub fn save_config(source: &Path, metadata_dir: &str, config: &RunConfig) -> Result<()> {
    config.validate()?;
    let path = config_path(source, metadata_dir);
    ConfigStore::new().save(&path, config)?;
    println!("{} Saved configuration to {}", "OK".green().bold(), path.as_str().cyan());
    Ok(())
}

/// Read the saved configuration for `cli.source`.
///
/// Only per-invocation switches (`--yes`, `--dry-run`, `--timestamp`) are
/// taken from the command line; everything else comes from the file.
pub fn load_config(cli: &Cli) -> Result<RunConfig> {
    let path = config_path(&cli.source, &cli.metadata_dir);
    let mut config: RunConfig = ConfigStore::new()
        .load_optional(&path)?
        .ok_or_else(|| CliError::user(format!("No saved configuration at {}", path)))?;

    let source = absolute(&cli.source)?;
    if config.source != source {
        return Err(CliError::user(format!(
            "Saved configuration is for {}, not {}",
            config.source.display(),
            source.display()
        )));
    }

    config.auto_confirm |= cli.yes;
    config.dry_run |= cli.dry_run;
    if let Some(timestamp) = &cli.timestamp {
        config.run_timestamp = timestamp.clone();
    }
    tracing::debug!(path = %path, "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn build_requires_dest() {
        let cli = Cli::try_parse_from(["treesync", "src"]).unwrap();
        assert!(matches!(build_config(&cli), Err(CliError::User { .. })));
    }

    #[test]
    fn build_maps_negated_flags() {
        let cli = Cli::try_parse_from([
            "treesync",
            "src",
            "dst",
            "--no-archive",
            "--no-cleanup",
            "--no-incremental",
            "--timestamp",
            "stamp",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();
        assert!(!config.archive);
        assert!(!config.cleanup_empty_dirs);
        assert!(!config.incremental);
        assert_eq!(config.run_timestamp, "stamp");
        assert!(config.source.is_absolute());
    }
}
