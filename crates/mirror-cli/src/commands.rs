//! Command implementations for the zipmirror binary

use std::path::Path;
use std::thread;
use std::time::Duration;

use colored::Colorize;

use mirror_core::{SyncConfig, SyncReport, Synchronizer};

use crate::error::Result;

/// Run one scan cycle and print the report.
pub fn run_once(config_path: &Path, json: bool) -> Result<()> {
    let config = SyncConfig::load(config_path)?;
    let report = Synchronizer::new(config).synchronize()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Run scan cycles forever, sleeping `interval` between them.
///
/// The config is reloaded before every cycle so edits take effect
/// without a restart. Cycle-level errors are logged and the loop
/// continues; the next cycle retries from scratch.
pub fn run_watch(config_path: &Path, interval: u64) -> Result<()> {
    println!(
        "{} watching {} (every {}s, Ctrl-C to stop)",
        "=>".blue().bold(),
        config_path.display().to_string().cyan(),
        interval
    );

    loop {
        match SyncConfig::load(config_path)
            .and_then(|config| Synchronizer::new(config).synchronize())
        {
            Ok(report) => {
                if report.writes() > 0 || !report.is_clean() {
                    print_report(&report);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "scan cycle failed, will retry");
            }
        }
        thread::sleep(Duration::from_secs(interval));
    }
}

fn print_report(report: &SyncReport) {
    println!(
        "{} {} added, {} updated, {} unchanged",
        "OK".green().bold(),
        report.added,
        report.updated,
        report.skipped
    );
    if report.walk_skipped > 0 {
        println!(
            "{} {} directory entries could not be read",
            "WARN".yellow().bold(),
            report.walk_skipped
        );
    }
    for error in &report.errors {
        println!("{} {}", "FAILED".red().bold(), error);
    }
}
