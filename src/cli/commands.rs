//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Page through HTTP APIs with the pageflow loader
#[derive(Parser, Debug)]
#[command(name = "pageflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML, or JSON with a .json extension)
    #[arg(short = 'C', long, global = true, default_value = "pageflow.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and validate the configuration
    Validate,

    /// Load the first page, then more pages until pagination completes
    Fetch {
        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,

        /// Extra query parameter (`key=value`, repeatable)
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Reload the first page periodically and report each refresh
    Poll {
        /// Number of refreshes to report before exiting
        #[arg(long, default_value = "3")]
        ticks: u64,

        /// Override the configured refresh interval
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Extra query parameter (`key=value`, repeatable)
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
