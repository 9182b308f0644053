//! The `--stats` command

use serde_json::json;
use treesync_core::{CrcMode, RunConfig, ScanOptions, walk};
use treesync_fs::checksum::format_checksum;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::render;

/// Print [`treesync_core::TreeStats`] of the source tree.
pub fn run_stats(cli: &Cli) -> Result<()> {
    if !cli.source.is_dir() {
        return Err(CliError::user(format!(
            "{} is not a directory",
            cli.source.display()
        )));
    }
    let layout = RunConfig {
        archive_dir: cli.archive_dir.clone(),
        metadata_dir: cli.metadata_dir.clone(),
        ..RunConfig::default()
    };

    let mut snapshot = walk(
        &cli.source,
        &ScanOptions::new(CrcMode::All, layout.ignored_dirs()),
        None,
    );
    let stats = snapshot.stats();

    if cli.json {
        let output = json!({
            "root": cli.source.display().to_string(),
            "files": stats.file_count,
            "directories": stats.dir_count,
            "size": stats.total_size,
            "checksum": format_checksum(stats.checksum_sum),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        render::print_stats(&cli.source.display().to_string(), &stats);
    }
    Ok(())
}
