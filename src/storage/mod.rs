//! Record store for book documents
//!
//! The gateway talks to a store only through [`BookStore`]: create, filtered
//! find, find by id, full replace by id and delete by id. "No such record" is
//! an `Ok(None)`, never an error.
//!
//! Two backends are provided:
//!
//! - [`MemoryStore`]: volatile, for tests and throwaway instances
//! - [`FileStore`]: append-only, CRC32-checksummed log with fsync on every
//!   write, replayed on open

mod errors;
mod file;
mod filter;
mod memory;
mod reader;
mod record;
mod writer;

use std::path::Path;
use std::sync::Arc;

use crate::book::{Book, BookFields, BookId};

pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use file::FileStore;
pub use filter::{BookFilter, TextMatch, YearCriterion};
pub use memory::{Collection, MemoryStore};
pub use reader::LogReader;
pub use record::{compute_checksum, LogRecord, RecordKind};
pub use writer::{LogWriter, LOG_FILE_NAME};

/// A flat collection of book documents
pub trait BookStore: Send + Sync {
    /// Persist a new record under a freshly assigned id
    fn insert(&self, fields: BookFields) -> StorageResult<Book>;

    /// All records matching `filter`, in store order
    fn find(&self, filter: &BookFilter) -> StorageResult<Vec<Book>>;

    fn find_by_id(&self, id: &BookId) -> StorageResult<Option<Book>>;

    /// Overwrite all fields of an existing record; returns the new state
    fn replace(&self, id: &BookId, fields: BookFields) -> StorageResult<Option<Book>>;

    /// Remove a record; returns what was removed
    fn remove(&self, id: &BookId) -> StorageResult<Option<Book>>;

    /// Flush and release the store. Later operations fail.
    fn close(&self) -> StorageResult<()>;
}

/// Which backend to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    File { data_dir: std::path::PathBuf },
}

/// Open a store handle for the given backend.
pub fn open_store(backend: &StoreBackend) -> StorageResult<Arc<dyn BookStore>> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::File { data_dir } => Ok(Arc::new(FileStore::open(Path::new(data_dir))?)),
    }
}
