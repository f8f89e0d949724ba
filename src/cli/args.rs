//! CLI argument definitions using clap
//!
//! Commands:
//! - bookshelf serve [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bookshelf - a book catalog REST API
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the store and serve the HTTP API until SIGINT/SIGTERM
    Serve {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
