//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use treesync_core::{ConflictPolicy, CrcMode, SyncMode};
use treesync_fs::DEFAULT_METADATA_DIR;

/// treesync - mirror, back up or two-way sync a directory tree
///
/// Files about to be overwritten or deleted are archived under
/// <root>/<archive-dir>/<timestamp>/ unless --no-archive is given.
#[derive(Parser, Debug)]
#[command(name = "treesync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source directory
    pub source: PathBuf,

    /// Destination directory (created if missing)
    pub dest: Option<PathBuf>,

    /// Reconciliation mode (mirror, backup or sync)
    #[arg(short, long, default_value = "mirror")]
    pub mode: SyncMode,

    /// Which side wins a conflict (source, dest, newer or none)
    #[arg(short, long, default_value = "source")]
    pub conflict: ConflictPolicy,

    /// When to compare file checksums (none, match or all)
    #[arg(short = 'r', long = "crc", default_value = "none")]
    pub crc_mode: CrcMode,

    /// Detect files renamed or moved on the source side
    #[arg(short, long)]
    pub detect_moves: bool,

    /// Delete instead of archiving
    #[arg(long)]
    pub no_archive: bool,

    /// Keep directories left empty by removals and moves
    #[arg(long)]
    pub no_cleanup: bool,

    /// Write neither the CSV log nor the snapshots
    #[arg(long)]
    pub suppress: bool,

    /// Ignore snapshots saved by earlier runs
    #[arg(long)]
    pub no_incremental: bool,

    /// Do not ask for confirmation
    #[arg(short = 'y', long = "yes", env = "TREESYNC_YES")]
    pub yes: bool,

    /// Show and log what would happen without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Only consider paths starting with a match of this regex (repeatable)
    #[arg(short, long = "filter", value_name = "REGEX")]
    pub filters: Vec<String>,

    /// Name of the archive folder inside each root
    #[arg(long, default_value = DEFAULT_METADATA_DIR)]
    pub archive_dir: String,

    /// Name of the folder holding snapshots, logs and saved configs
    #[arg(long, default_value = DEFAULT_METADATA_DIR)]
    pub metadata_dir: String,

    /// Override the run timestamp used for the archive folder and log name
    #[arg(long, value_name = "STAMP")]
    pub timestamp: Option<String>,

    /// Save these options to <SOURCE>/<metadata-dir>/config.json and exit
    #[arg(short, long, conflicts_with_all = ["load", "stats"])]
    pub save: bool,

    /// Run with the options saved in <SOURCE>/<metadata-dir>/config.json
    #[arg(short, long, conflicts_with = "stats")]
    pub load: bool,

    /// Print file count, directory count, size and checksum sum of SOURCE and exit
    #[arg(long)]
    pub stats: bool,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
