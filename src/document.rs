//! Access to values inside a nested configuration document by key path.
//!
//! Paths are never created implicitly: every segment must already exist, and
//! every segment but the last must hold a nested table.

use serde_json::{Map, Value};

use crate::{
    error::{Result, SpanError},
    key::Key,
};

/// A decoded configuration file: a table of nested values.
pub type Document = Map<String, Value>;

/// Field of the single-entry table that stands for a TOML datetime.
pub const DATETIME_FIELD: &str = "$__toml_private_datetime";

/// The text of a TOML datetime, if `value` holds one.
pub fn as_datetime(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) if map.len() == 1 => map.get(DATETIME_FIELD)?.as_str(),
        _ => None,
    }
}

/// Wrap datetime text so it is written back as a TOML datetime.
pub fn datetime(text: impl Into<String>) -> Value {
    let mut map = Map::new();
    map.insert(DATETIME_FIELD.to_string(), Value::String(text.into()));
    Value::Object(map)
}

/// Get the value at `key`.
pub fn get<'a>(doc: &'a Document, key: &Key) -> Result<&'a Value> {
    let (parent, last) = parent(doc, key)?;
    parent.get(last).ok_or_else(|| missing(key, last))
}

/// Get a mutable reference to the value at `key`.
pub fn get_mut<'a>(doc: &'a mut Document, key: &Key) -> Result<&'a mut Value> {
    let (parent, last) = parent_mut(doc, key)?;
    parent.get_mut(last).ok_or_else(|| missing(key, last))
}

/// Overwrite the value at `key`, returning the previous value.
pub fn replace(doc: &mut Document, key: &Key, value: Value) -> Result<Value> {
    let slot = get_mut(doc, key)?;
    Ok(std::mem::replace(slot, value))
}

/// Overwrite the value at `key`.
pub fn set(doc: &mut Document, key: &Key, value: Value) -> Result<()> {
    replace(doc, key, value).map(drop)
}

/// Navigate to the table holding the last segment of `key`.
fn parent<'a, 'k>(doc: &'a Document, key: &'k Key) -> Result<(&'a Document, &'k str)> {
    let Some((last, path)) = key.segments().split_last() else {
        return Err(missing(key, ""));
    };

    let mut current = doc;
    for segment in path {
        current = match current.get(segment) {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(not_a_document(key, segment)),
            None => return Err(missing(key, segment)),
        };
    }
    Ok((current, last))
}

fn parent_mut<'a, 'k>(doc: &'a mut Document, key: &'k Key) -> Result<(&'a mut Document, &'k str)> {
    let Some((last, path)) = key.segments().split_last() else {
        return Err(missing(key, ""));
    };

    let mut current = doc;
    for segment in path {
        current = match current.get_mut(segment) {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(not_a_document(key, segment)),
            None => return Err(missing(key, segment)),
        };
    }
    Ok((current, last))
}

fn missing(key: &Key, segment: &str) -> SpanError {
    SpanError::MissingSegment {
        key: key.clone(),
        segment: segment.to_string(),
    }
}

fn not_a_document(key: &Key, segment: &str) -> SpanError {
    SpanError::NotADocument {
        key: key.clone(),
        segment: segment.to_string(),
    }
}
