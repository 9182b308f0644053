//! Colored console output

use colored::Colorize;
use treesync_core::{RunStatus, SyncPlan, SyncReport, TreeStats};
use treesync_fs::checksum::format_checksum;

/// Human-readable byte count, in binary units.
pub fn pretty_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

pub fn print_plan(plan: &SyncPlan) {
    for issue in plan.source().scan_errors().iter().chain(plan.dest().scan_errors()) {
        println!("   {} {}: {}", "!".red(), issue.path.cyan(), issue.message);
    }
    for warning in plan.warnings() {
        println!("{} {}", "WARNING".yellow().bold(), warning);
    }

    let diff = plan.diff();
    if diff.is_empty() {
        println!("{} Trees are in sync.", "OK".green().bold());
        return;
    }
    for path in &diff.source_only {
        println!("   {} {}", "+".green(), path);
    }
    for path in &diff.dest_only {
        println!("   {} {}", "-".red(), path);
    }
    for path in &diff.changed {
        println!("   {} {}", "~".yellow(), path);
    }
    for pair in &diff.moved {
        println!("   {} {} {} {}", ">".blue(), pair.dest, "->".dimmed(), pair.source);
    }
    println!(
        "{} {} source only, {} destination only, {} changed, {} moved",
        "=>".blue().bold(),
        diff.source_only.len(),
        diff.dest_only.len(),
        diff.changed.len(),
        diff.moved.len()
    );
}

pub fn print_report(report: &SyncReport) {
    for action in &report.actions {
        println!("   {} {}", "-".dimmed(), action);
    }
    for error in &report.errors {
        println!("   {} {}", "x".red(), error);
    }
    let status = match report.status {
        RunStatus::Completed if report.errors.is_empty() => report.status.to_string().green().bold(),
        RunStatus::Completed => report.status.to_string().yellow().bold(),
        RunStatus::Aborted => report.status.to_string().red().bold(),
    };
    let suffix = if report.dry_run { " (dry run)" } else { "" };
    println!("{}{}", status, suffix);
    if let Some(path) = &report.log_path {
        println!("   Log: {}", path.display().to_string().dimmed());
    }
}

pub fn print_stats(root: &str, stats: &TreeStats) {
    println!("{} {}", "=>".blue().bold(), root.cyan());
    println!("   Files:       {}", stats.file_count);
    println!("   Directories: {}", stats.dir_count);
    println!("   Size:        {} ({} bytes)", pretty_size(stats.total_size), stats.total_size);
    println!("   Checksum:    {}", format_checksum(stats.checksum_sum));
}
