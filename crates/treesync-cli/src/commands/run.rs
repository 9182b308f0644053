//! The sync command

use colored::Colorize;
use treesync_core::{Confirm, RunConfig, RunStatus, SyncEngine};

use crate::error::{CliError, Result};
use crate::prompt::TerminalConfirm;
use crate::render;

/// Plan, show, confirm and execute one run.
///
/// An empty plan needs no confirmation; it still runs so snapshots and the
/// log are written.
pub fn run_sync(config: RunConfig, json: bool) -> Result<()> {
    let auto_confirm = config.auto_confirm;
    let engine = SyncEngine::new(config)?;

    if !json {
        println!(
            "{} Comparing {} {} {}",
            "=>".blue().bold(),
            engine.config().source.display().to_string().cyan(),
            "->".dimmed(),
            engine.config().dest.display().to_string().cyan()
        );
    }
    let plan = engine.plan()?;
    if !json {
        render::print_plan(&plan);
    }

    let proceed = plan.is_empty() || auto_confirm || TerminalConfirm.confirm(&plan)?;
    let report = if proceed {
        engine.execute(plan)?
    } else {
        engine.abort(plan)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::print_report(&report);
    }

    match report.status {
        RunStatus::Completed => Ok(()),
        RunStatus::Aborted => Err(CliError::Aborted),
    }
}
