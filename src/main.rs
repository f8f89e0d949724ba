//! bookshelf CLI entry point
//!
//! Parses arguments and delegates to `cli::run`. Errors go to stderr and
//! the process exits non-zero.

use bookshelf::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
