//! treesync CLI
//!
//! Reconciles a destination directory with a source directory.

mod cli;
mod commands;
mod error;
mod prompt;
mod render;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.stats {
        return commands::run_stats(&cli);
    }
    if cli.save {
        return commands::save_config(&cli.source, &cli.metadata_dir, &commands::build_config(&cli)?);
    }
    let config = if cli.load {
        commands::load_config(&cli)?
    } else {
        commands::build_config(&cli)?
    };
    commands::run_sync(config, cli.json)
}

/// Log to stderr at `warn` (or `RUST_LOG`), at `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{}: could not install logger: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");
}
