//! Book record types
//!
//! A `Book` is the only entity in the catalog. Its `id` is assigned by the
//! store on creation and never changes; the three content fields are always
//! replaced together.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned identifier of a book record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for BookId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// The validated content of a book: everything except its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub published_year: i64,
}

impl BookFields {
    pub fn new(title: impl Into<String>, author: impl Into<String>, published_year: i64) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            published_year,
        }
    }
}

/// A stored book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(flatten)]
    pub fields: BookFields,
}

impl Book {
    pub fn new(id: BookId, fields: BookFields) -> Self {
        Self { id, fields }
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }

    pub fn author(&self) -> &str {
        &self.fields.author
    }

    pub fn published_year(&self) -> i64 {
        self.fields.published_year
    }
}
