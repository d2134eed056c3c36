//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// zipmirror - mirror wildcard-selected files into a ZIP archive
#[derive(Parser, Debug)]
#[command(name = "zipmirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Append log events to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a single scan cycle and print the report
    Run {
        /// Config file: line 1 source dir, line 2 archive path, then one pattern per line
        #[arg(short, long, value_name = "PATH")]
        config: PathBuf,

        /// Output the report as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Run scan cycles in a loop until interrupted
    ///
    /// The config file is reloaded before every cycle. Cycle-level
    /// errors are logged and the loop keeps going.
    Watch {
        /// Config file: line 1 source dir, line 2 archive path, then one pattern per line
        #[arg(short, long, value_name = "PATH")]
        config: PathBuf,

        /// Seconds to sleep between cycles
        #[arg(short, long, default_value_t = 10)]
        interval: u64,
    },
}
