//! Append-only writer for the book log
//!
//! Every append is followed by fsync; an operation is not acknowledged until
//! its record is durable.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::LogRecord;

/// File name of the book log inside `<data_dir>/data/`
pub const LOG_FILE_NAME: &str = "books.log";

pub struct LogWriter {
    path: PathBuf,
    file: File,
    current_offset: u64,
}

impl LogWriter {
    /// Opens or creates `<data_dir>/data/books.log`, creating directories
    /// as needed.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let data_subdir = data_dir.join("data");
        let path = data_subdir.join(LOG_FILE_NAME);

        if !data_subdir.exists() {
            fs::create_dir_all(&data_subdir).map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to create data directory: {}", data_subdir.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open book log: {}", path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::write_failed("Failed to read book log metadata", e))?
            .len();

        Ok(Self {
            path,
            file,
            current_offset,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Appends a record and fsyncs. Returns the offset it was written at.
    ///
    /// On failure the log is truncated back to that offset, so a record
    /// that was reported as failed never reappears on replay.
    pub fn append(&mut self, record: &LogRecord) -> StorageResult<u64> {
        let serialized = record.serialize();
        let offset = self.current_offset;

        if let Err(err) = self.write_durably(&serialized, &record.book_id) {
            self.truncate_to(offset)?;
            return Err(err);
        }

        self.current_offset += serialized.len() as u64;
        Ok(offset)
    }

    fn write_durably(&mut self, bytes: &[u8], book_id: &str) -> StorageResult<()> {
        self.file.write_all(bytes).map_err(|e| {
            StorageError::write_failed(format!("Failed to append record for {}", book_id), e)
        })?;

        self.file.sync_all().map_err(|e| {
            StorageError::write_failed(
                format!("fsync failed after appending record for {}", book_id),
                e,
            )
        })
    }

    /// Drops everything past `offset`.
    fn truncate_to(&mut self, offset: u64) -> StorageResult<()> {
        self.file
            .set_len(offset)
            .and_then(|_| self.file.sync_all())
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to roll book log back to offset {}", offset),
                    e,
                )
            })?;
        self.current_offset = offset;
        Ok(())
    }

    /// Flushes file contents and metadata to disk.
    pub fn sync(&mut self) -> StorageResult<()> {
        self.file
            .sync_all()
            .map_err(|e| StorageError::write_failed("fsync failed on book log", e))
    }
}
