//! # REST API Errors
//!
//! Validation and malformed-identifier errors are client errors (400).
//! `NotFound` is an ordinary outcome (404). Store failures are 500.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::storage::StorageError;

use super::response::ErrorResponse;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Clone, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// `title`, `author` or `publishedYear` absent or falsy
    #[error("Title, author, and publishedYear are required")]
    MissingFields,

    /// `publishedYear` not an integer-valued number, or negative
    #[error("publishedYear must be a valid positive number")]
    InvalidYear,

    /// A text field that is present but not a string
    #[error("{0} must be a string")]
    InvalidField(&'static str),

    /// Path identifier not in the store's id format
    #[error("Invalid book ID format")]
    InvalidIdentifier,

    /// Body could not be read as JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Book not found")]
    NotFound,

    #[error("Route not found")]
    RouteNotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("{0}")]
    Storage(String),
}

impl RestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::MissingFields => StatusCode::BAD_REQUEST,
            RestError::InvalidYear => StatusCode::BAD_REQUEST,
            RestError::InvalidField(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidIdentifier => StatusCode::BAD_REQUEST,
            RestError::InvalidBody(_) => StatusCode::BAD_REQUEST,

            RestError::NotFound => StatusCode::NOT_FOUND,
            RestError::RouteNotFound => StatusCode::NOT_FOUND,

            RestError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        RestError::Storage(err.to_string())
    }
}

impl From<JsonRejection> for RestError {
    fn from(rejection: JsonRejection) -> Self {
        RestError::InvalidBody(rejection.body_text())
    }
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}
