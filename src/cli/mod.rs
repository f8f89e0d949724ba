//! CLI module for bookshelf
//!
//! Provides command-line interface for:
//! - serve: Open the configured store and serve the HTTP API

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{run, run_command, serve};
pub use config::{AppConfig, BackendKind, StorageConfig};
pub use errors::{CliError, CliResult};
