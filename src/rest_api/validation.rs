//! # Request Validation
//!
//! The single gate between a loosely-typed JSON body and a typed
//! [`BookFields`]. Create and replace share the same rules: all three fields
//! are required every time.
//!
//! A field counts as missing when it is absent, `null`, `false`, `0` or `""`.
//! That makes `publishedYear: 0` a missing field rather than an invalid year.

use serde_json::{Number, Value};

use crate::book::{BookFields, BookId};

use super::errors::{RestError, RestResult};

/// Validate a create or full-replace payload.
pub fn validate_create_or_replace(payload: &Value) -> RestResult<BookFields> {
    let title = payload.get("title");
    let author = payload.get("author");
    let year = payload.get("publishedYear");

    if !is_truthy(title) || !is_truthy(author) || !is_truthy(year) {
        return Err(RestError::MissingFields);
    }

    let published_year = match year {
        Some(Value::Number(n)) => integer_value(n).ok_or(RestError::InvalidYear)?,
        _ => return Err(RestError::InvalidYear),
    };
    if published_year < 0 {
        return Err(RestError::InvalidYear);
    }

    let title = text_field("title", title)?;
    let author = text_field("author", author)?;

    Ok(BookFields::new(title, author, published_year))
}

/// Parse a path identifier, distinguishing malformed ids from unknown ones.
pub fn validate_identifier(raw: &str) -> RestResult<BookId> {
    raw.parse().map_err(|_| RestError::InvalidIdentifier)
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Integer value of a JSON number, accepting integral floats such as `1949.0`.
fn integer_value(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.is_u64() {
        // Beyond i64::MAX
        return None;
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn text_field(name: &'static str, value: Option<&Value>) -> RestResult<String> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(RestError::InvalidField(name)),
    }
}
