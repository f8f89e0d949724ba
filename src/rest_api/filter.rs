//! # Book Filters
//!
//! Turns the optional `author`, `year` and `search` query parameters into
//! store criteria.

use std::collections::HashMap;

use crate::storage::{BookFilter, TextMatch, YearCriterion};

/// Raw read-side query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    pub author: Option<String>,
    pub year: Option<String>,
    pub search: Option<String>,
}

impl BookQuery {
    /// Pick the recognised parameters out of a query map; others are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            author: params.get("author").cloned(),
            year: params.get("year").cloned(),
            search: params.get("search").cloned(),
        }
    }
}

/// Build filter criteria from query parameters. Empty values add nothing.
pub fn build_filter(query: &BookQuery) -> BookFilter {
    let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);

    BookFilter {
        author: non_empty(&query.author).map(|a| TextMatch::new(&a)),
        year: non_empty(&query.year).map(|y| YearCriterion::parse(&y)),
        search: non_empty(&query.search).map(|s| TextMatch::new(&s)),
    }
}
