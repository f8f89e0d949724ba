//! Durable store backed by the append-only book log
//!
//! On open the log is replayed into an in-memory collection: puts upsert,
//! tombstones remove, later records win. Every mutation is appended and
//! fsynced before the in-memory collection changes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::book::{Book, BookFields, BookId};
use super::filter::BookFilter;

use super::errors::{StorageError, StorageResult};
use super::memory::Collection;
use super::reader::LogReader;
use super::record::{LogRecord, RecordKind};
use super::writer::LogWriter;
use super::BookStore;

struct FileState {
    writer: LogWriter,
    books: Collection,
}

pub struct FileStore {
    state: RwLock<FileState>,
    closed: AtomicBool,
}

impl FileStore {
    /// Opens the store under `data_dir`, replaying any existing log.
    ///
    /// Fails with a fatal corruption error if any record is damaged.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let writer = LogWriter::open(data_dir)?;
        let books = Self::replay(writer.path())?;

        Ok(Self {
            state: RwLock::new(FileState { writer, books }),
            closed: AtomicBool::new(false),
        })
    }

    fn replay(path: &Path) -> StorageResult<Collection> {
        let mut books = Collection::new();

        let len = fs::metadata(path)
            .map_err(|e| StorageError::io_error("Failed to read book log metadata", e))?
            .len();
        if len == 0 {
            return Ok(books);
        }

        let mut reader = LogReader::open(path)?;
        loop {
            let offset = reader.current_offset();
            let record = match reader.read_next()? {
                Some(record) => record,
                None => break,
            };

            match record.kind {
                RecordKind::Put => {
                    let book = record.to_book().map_err(|e| {
                        StorageError::corruption_at_offset(offset, e.to_string())
                    })?;
                    books.upsert(book);
                }
                RecordKind::Tombstone => {
                    let id: BookId = record.book_id.parse().map_err(|e| {
                        StorageError::corruption_at_offset(offset, format!("Invalid book id: {}", e))
                    })?;
                    books.remove(&id);
                }
            }
        }

        Ok(books)
    }

    /// Path of the underlying log file
    pub fn path(&self) -> StorageResult<PathBuf> {
        let state = self.state.read().map_err(|_| StorageError::poisoned())?;
        Ok(state.writer.path().to_path_buf())
    }

    /// Number of live records
    pub fn count(&self) -> StorageResult<usize> {
        let state = self.state.read().map_err(|_| StorageError::poisoned())?;
        Ok(state.books.count())
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StorageError::closed());
        }
        Ok(())
    }

    fn put_record(book: &Book) -> StorageResult<LogRecord> {
        LogRecord::put(book).map_err(|e| StorageError::encoding(e.to_string()))
    }
}

impl BookStore for FileStore {
    fn insert(&self, fields: BookFields) -> StorageResult<Book> {
        self.ensure_open()?;
        let book = Book::new(BookId::generate(), fields);
        let record = Self::put_record(&book)?;

        let mut state = self.state.write().map_err(|_| StorageError::poisoned())?;
        state.writer.append(&record)?;
        state.books.upsert(book.clone());
        Ok(book)
    }

    fn find(&self, filter: &BookFilter) -> StorageResult<Vec<Book>> {
        self.ensure_open()?;
        let state = self.state.read().map_err(|_| StorageError::poisoned())?;
        Ok(state.books.matching(filter))
    }

    fn find_by_id(&self, id: &BookId) -> StorageResult<Option<Book>> {
        self.ensure_open()?;
        let state = self.state.read().map_err(|_| StorageError::poisoned())?;
        Ok(state.books.get(id).cloned())
    }

    fn replace(&self, id: &BookId, fields: BookFields) -> StorageResult<Option<Book>> {
        self.ensure_open()?;
        let mut state = self.state.write().map_err(|_| StorageError::poisoned())?;
        if state.books.get(id).is_none() {
            return Ok(None);
        }

        let book = Book::new(*id, fields);
        state.writer.append(&Self::put_record(&book)?)?;
        Ok(state.books.replace(id, book.fields))
    }

    fn remove(&self, id: &BookId) -> StorageResult<Option<Book>> {
        self.ensure_open()?;
        let mut state = self.state.write().map_err(|_| StorageError::poisoned())?;
        if state.books.get(id).is_none() {
            return Ok(None);
        }

        state.writer.append(&LogRecord::tombstone(id))?;
        Ok(state.books.remove(id))
    }

    fn close(&self) -> StorageResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let mut state = self.state.write().map_err(|_| StorageError::poisoned())?;
        state.writer.sync()
    }
}
