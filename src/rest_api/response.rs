//! # Response Formatting

use serde::Serialize;

use crate::book::Book;

/// Body of every error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Delete response; echoes the removed record so clients can show it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub message: String,
    pub deleted_book: Book,
}

impl DeleteResponse {
    pub fn new(deleted_book: Book) -> Self {
        Self {
            message: "Book deleted".to_string(),
            deleted_book,
        }
    }
}
