//! Storage error types
//!
//! Error codes:
//! - BOOKSHELF_STORAGE_IO_ERROR (ERROR severity)
//! - BOOKSHELF_STORAGE_WRITE_FAILED (ERROR severity)
//! - BOOKSHELF_STORAGE_CLOSED (ERROR severity)
//! - BOOKSHELF_DATA_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, server continues
    Error,
    /// Store cannot be trusted; startup must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Disk I/O failure or poisoned in-memory state
    StorageIoError,
    /// Record append or fsync failed
    StorageWriteFailed,
    /// Operation attempted after the store was closed
    StorageClosed,
    /// Checksum or framing failure in the record log
    DataCorruption,
}

impl StorageErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::StorageIoError => "BOOKSHELF_STORAGE_IO_ERROR",
            StorageErrorCode::StorageWriteFailed => "BOOKSHELF_STORAGE_WRITE_FAILED",
            StorageErrorCode::StorageClosed => "BOOKSHELF_STORAGE_CLOSED",
            StorageErrorCode::DataCorruption => "BOOKSHELF_DATA_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::DataCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with code, message and optional context
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StorageError {
    fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// I/O failure while opening or reading the store
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(StorageErrorCode::StorageIoError, message)
        }
    }

    /// Append or fsync failure
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(StorageErrorCode::StorageWriteFailed, message)
        }
    }

    /// In-memory collection lock was poisoned by a panicking writer
    pub fn poisoned() -> Self {
        Self::new(StorageErrorCode::StorageIoError, "Store lock poisoned")
    }

    /// Store handle used after `close`
    pub fn closed() -> Self {
        Self::new(StorageErrorCode::StorageClosed, "Store is closed")
    }

    /// Record body could not be encoded or decoded as JSON
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::StorageWriteFailed, message)
    }

    /// Corruption found at a byte offset in the record log
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            details: Some(format!("byte_offset: {}", offset)),
            ..Self::new(StorageErrorCode::DataCorruption, reason)
        }
    }

    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this error must abort startup
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
