//! Book log record format
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Kind             | (u8: 0 = put, 1 = tombstone)
//! +------------------+
//! | Book ID          | (length-prefixed string)
//! +------------------+
//! | Body             | (length-prefixed JSON bytes, empty for tombstones)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 over everything before it)
//! +------------------+
//! ```

use std::io::{self, Cursor, Read};

use crc32fast::Hasher;

use crate::book::{Book, BookFields, BookId};

/// Smallest possible record: length + kind + empty id + empty body + checksum
pub const MIN_RECORD_SIZE: usize = 4 + 1 + 4 + 4 + 4;

/// What a log record does to the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Insert or full replacement of a book
    Put = 0,
    /// Removal of a book
    Tombstone = 1,
}

impl RecordKind {
    fn from_byte(byte: u8) -> io::Result<Self> {
        match byte {
            0 => Ok(RecordKind::Put),
            1 => Ok(RecordKind::Tombstone),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown record kind: {}", other),
            )),
        }
    }
}

/// One entry of the append-only book log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub kind: RecordKind,
    pub book_id: String,
    pub body: Vec<u8>,
}

impl LogRecord {
    /// Record that stores the full current state of `book`
    pub fn put(book: &Book) -> serde_json::Result<Self> {
        Ok(Self {
            kind: RecordKind::Put,
            book_id: book.id.to_string(),
            body: serde_json::to_vec(&book.fields)?,
        })
    }

    /// Record that removes the book with `id`
    pub fn tombstone(id: &BookId) -> Self {
        Self {
            kind: RecordKind::Tombstone,
            book_id: id.to_string(),
            body: Vec::new(),
        }
    }

    /// Decode the body of a put record back into a book
    pub fn to_book(&self) -> io::Result<Book> {
        let id: BookId = self.book_id.parse().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid book id: {}", e))
        })?;
        let fields: BookFields = serde_json::from_slice(&self.body)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Book::new(id, fields))
    }

    /// Serialize the complete record, length prefix and checksum included.
    pub fn serialize(&self) -> Vec<u8> {
        let body_len = 1 + 4 + self.book_id.len() + 4 + self.body.len();
        let record_length = (4 + body_len + 4) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.push(self.kind as u8);
        record.extend_from_slice(&(self.book_id.len() as u32).to_le_bytes());
        record.extend_from_slice(self.book_id.as_bytes());
        record.extend_from_slice(&(self.body.len() as u32).to_le_bytes());
        record.extend_from_slice(&self.body);

        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserialize a record from bytes, verifying its checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = compute_checksum(&data[..checksum_offset]);

        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = Cursor::new(&data[4..checksum_offset]);

        let mut kind_buf = [0u8; 1];
        cursor.read_exact(&mut kind_buf)?;
        let kind = RecordKind::from_byte(kind_buf[0])?;

        let book_id = String::from_utf8(read_bytes(&mut cursor)?).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e))
        })?;
        let body = read_bytes(&mut cursor)?;

        Ok((Self { kind, book_id, body }, record_length))
    }
}

fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// CRC32 (IEEE) over `data`
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
