//! In-memory book collection and the volatile store built on it

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::book::{Book, BookFields, BookId};
use super::filter::BookFilter;

use super::errors::{StorageError, StorageResult};
use super::BookStore;

/// Flat collection of books in insertion order
#[derive(Debug, Default, Clone)]
pub struct Collection {
    books: Vec<Book>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.books.len()
    }

    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| &b.id == id)
    }

    pub fn matching(&self, filter: &BookFilter) -> Vec<Book> {
        self.books
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect()
    }

    /// Inserts `book`, or overwrites the existing record with the same id in
    /// place.
    pub fn upsert(&mut self, book: Book) {
        match self.books.iter_mut().find(|b| b.id == book.id) {
            Some(existing) => *existing = book,
            None => self.books.push(book),
        }
    }

    /// Overwrites the fields of an existing record. Returns the updated record.
    pub fn replace(&mut self, id: &BookId, fields: BookFields) -> Option<Book> {
        let existing = self.books.iter_mut().find(|b| &b.id == id)?;
        existing.fields = fields;
        Some(existing.clone())
    }

    pub fn remove(&mut self, id: &BookId) -> Option<Book> {
        let pos = self.books.iter().position(|b| &b.id == id)?;
        Some(self.books.remove(pos))
    }
}

/// Store that keeps every record in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    books: RwLock<Collection>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StorageError::closed());
        }
        Ok(())
    }
}

impl BookStore for MemoryStore {
    fn insert(&self, fields: BookFields) -> StorageResult<Book> {
        self.ensure_open()?;
        let book = Book::new(BookId::generate(), fields);
        let mut books = self.books.write().map_err(|_| StorageError::poisoned())?;
        books.upsert(book.clone());
        Ok(book)
    }

    fn find(&self, filter: &BookFilter) -> StorageResult<Vec<Book>> {
        self.ensure_open()?;
        let books = self.books.read().map_err(|_| StorageError::poisoned())?;
        Ok(books.matching(filter))
    }

    fn find_by_id(&self, id: &BookId) -> StorageResult<Option<Book>> {
        self.ensure_open()?;
        let books = self.books.read().map_err(|_| StorageError::poisoned())?;
        Ok(books.get(id).cloned())
    }

    fn replace(&self, id: &BookId, fields: BookFields) -> StorageResult<Option<Book>> {
        self.ensure_open()?;
        let mut books = self.books.write().map_err(|_| StorageError::poisoned())?;
        Ok(books.replace(id, fields))
    }

    fn remove(&self, id: &BookId) -> StorageResult<Option<Book>> {
        self.ensure_open()?;
        let mut books = self.books.write().map_err(|_| StorageError::poisoned())?;
        Ok(books.remove(id))
    }

    fn close(&self) -> StorageResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
