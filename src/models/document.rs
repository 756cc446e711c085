//! Untyped reference documents and natural-key extraction.

use serde_json::{Map, Value};

/// A JSON object as read from a source database or fallback blob.
pub type Document = Map<String, Value>;

/// Internal identifier assigned by the source store; never copied.
pub const SOURCE_ID_FIELD: &str = "_id";

/// Reads the natural key of `document` as text.
///
/// A missing or null key is `None` and is stored as SQL NULL. Strings are taken
/// verbatim, empty ones included; other values are stored as their JSON text.
pub fn key_value(document: &Document, key_field: &str) -> Option<String> {
    match document.get(key_field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
