//! CLI module for the mandi price service
//!
//! Provides command-line interface for:
//! - serve: Load the dataset and serve the HTTP API
//! - stats: One-shot statistics to stdout

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, ServeArgs};
pub use commands::{resolve_config, run, run_command, serve, stats};
pub use errors::{CliError, CliErrorCode, CliResult};
