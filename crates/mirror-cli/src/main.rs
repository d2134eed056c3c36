//! zipmirror CLI
//!
//! Mirrors wildcard-selected files from a source tree into a ZIP
//! archive, incrementally: `run` performs one scan cycle, `watch`
//! loops at a fixed interval the way the original background service
//! did.

mod cli;
mod commands;
mod error;

use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    match cli.command {
        Commands::Run { config, json } => commands::run_once(&config, json),
        Commands::Watch { config, interval } => commands::run_watch(&config, interval),
    }
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            builder.with_writer(std::io::stderr).init();
        }
    }
    Ok(())
}
