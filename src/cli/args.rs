//! CLI argument definitions using clap
//!
//! Commands:
//! - querify filter --query <json> [--sort-by <spec>] [--select <fields>]
//! - querify check --query <json>
//! - querify match --query <json>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// querify - filter JSON documents with MongoDB-style queries
#[derive(Parser, Debug)]
#[command(name = "querify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to compiler configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write trace-level events to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter documents read from stdin (JSON array or one document per line)
    Filter {
        /// Query as JSON
        #[arg(long, default_value = "{}")]
        query: String,

        /// Field name, or a JSON object of field to direction
        #[arg(long)]
        sort_by: Option<String>,

        /// Comma-separated list of fields to keep
        #[arg(long, value_delimiter = ',')]
        select: Option<Vec<String>>,
    },

    /// Compile a query and report whether it is valid
    Check {
        /// Query as JSON
        #[arg(long)]
        query: String,
    },

    /// Evaluate a query in transition mode against
    /// `{"current": .., "previous": ..}` lines from stdin
    Match {
        /// Query as JSON
        #[arg(long)]
        query: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
