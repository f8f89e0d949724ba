//! CLI command implementations
//!
//! `serve` follows a fixed lifecycle: load config, open the store, bind,
//! serve until a shutdown signal, drain in-flight requests, close the store.

use std::path::Path;

use crate::http_server::{shutdown_signal, HttpServer};
use crate::observability::{log_event, Event};
use crate::storage::{open_store, BookStore, StoreBackend};

use super::args::Command;
use super::config::AppConfig;
use super::errors::{CliError, CliResult};

/// Parse process arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(config.as_deref()),
    }
}

pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    log_event(Event::BootStart, &[]);

    let result = boot_and_serve(config_path);
    if let Err(e) = &result {
        log_event(
            Event::BootFailed,
            &[("code", e.code_str()), ("error", &e.to_string())],
        );
    }
    result
}

fn boot_and_serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;
    let backend = config.store_backend()?;
    log_event(
        Event::ConfigLoaded,
        &[
            ("addr", &config.server.socket_addr()),
            ("backend", backend_name(&backend)),
            ("environment", &config.environment),
        ],
    );

    let store = open_store(&backend)?;
    log_event(Event::StoreOpened, &[("backend", backend_name(&backend))]);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    let server = HttpServer::new(config.server.clone(), &config.environment, store.clone());
    let served = rt.block_on(async {
        let listener = server
            .bind()
            .await
            .map_err(|e| CliError::boot_failed(format!("Failed to bind {}: {}", server.socket_addr(), e)))?;

        server
            .serve(listener, shutdown_signal())
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    });

    // The store is closed even when serving failed after bind.
    close_store(store.as_ref())?;
    served?;

    log_event(Event::ShutdownComplete, &[]);
    Ok(())
}

fn close_store(store: &dyn BookStore) -> CliResult<()> {
    store.close()?;
    log_event(Event::StoreClosed, &[]);
    Ok(())
}

fn backend_name(backend: &StoreBackend) -> &'static str {
    match backend {
        StoreBackend::Memory => "memory",
        StoreBackend::File { .. } => "file",
    }
}
