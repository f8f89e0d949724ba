//! Sequential reader over the book log
//!
//! Every record's checksum is verified as it is read. A short, oversized or
//! mismatching record is reported as corruption with its byte offset.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::errors::{StorageError, StorageResult};
use super::record::{LogRecord, MIN_RECORD_SIZE};

pub struct LogReader {
    reader: BufReader<File>,
    current_offset: u64,
    file_size: u64,
}

impl LogReader {
    /// Opens the log file for reading.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = File::open(path).map_err(|e| {
            StorageError::io_error(format!("Failed to open book log: {}", path.display()), e)
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StorageError::io_error("Failed to read book log metadata", e))?
            .len();

        Ok(Self {
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
        })
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Reads the next record.
    ///
    /// Returns `Ok(None)` at end of file.
    pub fn read_next(&mut self) -> StorageResult<Option<LogRecord>> {
        if self.current_offset >= self.file_size {
            return Ok(None);
        }

        let remaining = self.file_size - self.current_offset;
        if remaining < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Truncated log: {} bytes remaining, minimum record size is {}",
                    remaining, MIN_RECORD_SIZE
                ),
            ));
        }

        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record length: {}", e),
            )
        })?;
        let record_length = u32::from_le_bytes(len_buf) as u64;

        if record_length < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if record_length > remaining {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Record length {} exceeds remaining file size {}",
                    record_length, remaining
                ),
            ));
        }

        let mut record_buf = vec![0u8; record_length as usize];
        record_buf[0..4].copy_from_slice(&len_buf);
        self.reader.read_exact(&mut record_buf[4..]).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record body: {}", e),
            )
        })?;

        let (record, consumed) = LogRecord::deserialize(&record_buf)
            .map_err(|e| StorageError::corruption_at_offset(self.current_offset, e.to_string()))?;

        self.current_offset += consumed as u64;
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{Book, BookFields, BookId};
    use std::fs;
    use tempfile::TempDir;

    fn write_records(path: &Path, records: &[LogRecord]) {
        let bytes: Vec<u8> = records.iter().flat_map(|r| r.serialize()).collect();
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_reads_records_in_file_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.log");
        let book = Book::new(BookId::generate(), BookFields::new("Dune", "Frank Herbert", 1965));
        write_records(
            &path,
            &[LogRecord::put(&book).unwrap(), LogRecord::tombstone(&book.id)],
        );

        let mut reader = LogReader::open(&path).unwrap();
        assert_eq!(reader.read_next().unwrap().unwrap().to_book().unwrap(), book);
        assert!(reader.read_next().unwrap().is_some());
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_trailing_garbage_is_corruption() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.log");
        let mut bytes = LogRecord::tombstone(&BookId::generate()).serialize();
        let first_len = bytes.len() as u64;
        bytes.extend_from_slice(&[1, 2, 3]);
        fs::write(&path, bytes).unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_some());

        let err = reader.read_next().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.details(), Some(format!("byte_offset: {}", first_len).as_str()));
    }
}
