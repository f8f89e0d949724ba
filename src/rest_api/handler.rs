//! # Book Gateway
//!
//! Performs exactly one store operation per request and maps "no such record"
//! to [`RestError::NotFound`]. Inputs arrive already validated.

use std::sync::Arc;

use crate::book::{Book, BookFields, BookId};
use crate::observability::{Event, Logger};
use crate::storage::{BookFilter, BookStore, StorageError};

use super::errors::{RestError, RestResult};

pub struct BookGateway {
    store: Arc<dyn BookStore>,
}

impl BookGateway {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn BookStore> {
        &self.store
    }

    pub fn create(&self, fields: BookFields) -> RestResult<Book> {
        let book = self.store.insert(fields).map_err(|e| store_failure("create", e))?;
        Logger::info(Event::BookCreated, &[("id", &book.id.to_string())]);
        Ok(book)
    }

    pub fn list_all(&self, filter: &BookFilter) -> RestResult<Vec<Book>> {
        self.store.find(filter).map_err(|e| store_failure("list", e))
    }

    pub fn get_by_id(&self, id: &BookId) -> RestResult<Book> {
        self.store
            .find_by_id(id)
            .map_err(|e| store_failure("get", e))?
            .ok_or(RestError::NotFound)
    }

    /// Overwrites all three fields; returns the post-update record.
    pub fn replace_by_id(&self, id: &BookId, fields: BookFields) -> RestResult<Book> {
        let book = self
            .store
            .replace(id, fields)
            .map_err(|e| store_failure("replace", e))?
            .ok_or(RestError::NotFound)?;
        Logger::info(Event::BookReplaced, &[("id", &book.id.to_string())]);
        Ok(book)
    }

    /// Removes the record and returns its last state.
    pub fn delete_by_id(&self, id: &BookId) -> RestResult<Book> {
        let book = self
            .store
            .remove(id)
            .map_err(|e| store_failure("delete", e))?
            .ok_or(RestError::NotFound)?;
        Logger::info(Event::BookDeleted, &[("id", &book.id.to_string())]);
        Ok(book)
    }
}

fn store_failure(operation: &str, err: StorageError) -> RestError {
    Logger::error(
        Event::StoreFailure,
        &[
            ("code", err.code().code()),
            ("message", &err.to_string()),
            ("operation", operation),
        ],
    );
    RestError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest_api::filter::{build_filter, BookQuery};
    use crate::storage::MemoryStore;

    fn gateway() -> BookGateway {
        BookGateway::new(Arc::new(MemoryStore::new()))
    }

    fn orwell() -> BookFields {
        BookFields::new("1984", "George Orwell", 1949)
    }

    #[test]
    fn test_create_then_get_returns_same_fields() {
        let gw = gateway();
        let created = gw.create(orwell()).unwrap();
        let fetched = gw.get_by_id(&created.id).unwrap();

        assert_eq!(fetched.fields, orwell());
    }

    #[test]
    fn test_list_all_with_year_filter() {
        let gw = gateway();
        gw.create(orwell()).unwrap();
        gw.create(BookFields::new("Animal Farm", "George Orwell", 1945)).unwrap();

        let filter = build_filter(&BookQuery {
            year: Some("1949".to_string()),
            ..Default::default()
        });
        let books = gw.list_all(&filter).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title(), "1984");
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let gw = gateway();
        let id = BookId::generate();

        assert!(matches!(gw.get_by_id(&id), Err(RestError::NotFound)));
        assert!(matches!(gw.replace_by_id(&id, orwell()), Err(RestError::NotFound)));
        assert!(matches!(gw.delete_by_id(&id), Err(RestError::NotFound)));
    }

    #[test]
    fn test_delete_is_not_idempotent() {
        let gw = gateway();
        let created = gw.create(orwell()).unwrap();

        assert_eq!(gw.delete_by_id(&created.id).unwrap(), created);
        assert!(matches!(gw.delete_by_id(&created.id), Err(RestError::NotFound)));
    }

    #[test]
    fn test_store_failure_is_server_error() {
        let gw = gateway();
        gw.store().close().unwrap();

        let err = gw.list_all(&BookFilter::default()).unwrap_err();
        assert!(matches!(err, RestError::Storage(_)));
        assert!(!err.is_client_error());
    }
}
