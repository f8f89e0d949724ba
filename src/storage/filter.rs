//! Read-side criteria evaluated by every store backend
//!
//! Each present criterion adds one constraint and all constraints must
//! hold, so `author` and `search` together narrow rather than widen.

use regex::{Regex, RegexBuilder};

use crate::book::Book;

/// Case-insensitive literal substring match
#[derive(Debug, Clone)]
pub struct TextMatch {
    needle: String,
    pattern: Option<Regex>,
}

impl TextMatch {
    pub fn new(needle: &str) -> Self {
        let pattern = RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()
            .ok();
        Self {
            needle: needle.to_lowercase(),
            pattern,
        }
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match &self.pattern {
            Some(re) => re.is_match(haystack),
            // Only reached if the escaped needle exceeds the regex size limit
            None => haystack.to_lowercase().contains(&self.needle),
        }
    }
}

/// Constraint on `publishedYear`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearCriterion {
    Exact(i64),
    /// The `year` parameter had no leading integer; nothing matches.
    Unmatchable,
}

impl YearCriterion {
    /// Leading-integer parse: optional sign, then hex digits after a `0x`
    /// prefix or decimal digits otherwise. Trailing text is ignored.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim_start();
        let (negative, unsigned) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (radix, body) = match unsigned.get(..2) {
            Some("0x") | Some("0X") => (16, &unsigned[2..]),
            _ => (10, unsigned),
        };

        let end = body
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(body.len());

        match i64::from_str_radix(&body[..end], radix) {
            Ok(n) if negative => YearCriterion::Exact(-n),
            Ok(n) => YearCriterion::Exact(n),
            Err(_) => YearCriterion::Unmatchable,
        }
    }

    fn matches(&self, year: i64) -> bool {
        match self {
            YearCriterion::Exact(y) => *y == year,
            YearCriterion::Unmatchable => false,
        }
    }
}

/// Filter criteria for listing books. The default matches everything.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub author: Option<TextMatch>,
    pub year: Option<YearCriterion>,
    /// Matches if either title or author contains the term
    pub search: Option<TextMatch>,
}

impl BookFilter {
    pub fn is_unconstrained(&self) -> bool {
        self.author.is_none() && self.year.is_none() && self.search.is_none()
    }

    pub fn matches(&self, book: &Book) -> bool {
        if let Some(author) = &self.author {
            if !author.is_match(book.author()) {
                return false;
            }
        }

        if let Some(year) = &self.year {
            if !year.matches(book.published_year()) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            if !search.is_match(book.title()) && !search.is_match(book.author()) {
                return false;
            }
        }

        true
    }
}
