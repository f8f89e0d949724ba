//! bookshelf - a book catalog REST API
//!
//! Layers, bottom up:
//! - `book`: record types and identifiers
//! - `storage`: the record store (in-memory or append-only log on disk)
//! - `rest_api`: validation, filtering and the `/api/books` routes
//! - `http_server`: router assembly, health check, CORS, serving
//! - `cli`: configuration and process lifecycle

pub mod book;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod rest_api;
pub mod storage;
