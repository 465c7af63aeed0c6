//! CLI module for querify
//!
//! Provides command-line interface for:
//! - filter: Filter, sort and project documents from stdin
//! - check: Validate a query
//! - match: Transition-mode evaluation of current/previous pairs

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, filter, filter_options, run, run_cli, run_command, transition_match};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_documents, write_error, write_response};
