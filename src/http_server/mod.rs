//! # HTTP Server Module
//!
//! # Endpoints
//!
//! - `/api/health` - Health check
//! - `/api/books` - Book catalog CRUD
//!
//! Anything else is a JSON 404, or a file from the configured static
//! directory.

pub mod config;
pub mod health_routes;
pub mod observe;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{shutdown_signal, HttpServer};
