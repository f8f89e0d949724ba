//! # Book REST API
//!
//! Validation, filter construction and the store gateway behind the
//! `/api/books` endpoints.

pub mod errors;
pub mod filter;
pub mod handler;
pub mod response;
pub mod server;
pub mod validation;

pub use errors::{RestError, RestResult};
pub use filter::{build_filter, BookQuery};
pub use handler::BookGateway;
pub use response::{DeleteResponse, ErrorResponse};
pub use server::book_routes;
pub use validation::{validate_create_or_replace, validate_identifier};
