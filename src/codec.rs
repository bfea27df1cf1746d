//! File formats for reading and writing configuration documents.
//!
//! Codecs are selected by file extension (case insensitive). TOML and JSON
//! are supported; both preserve the key order of the input.
//!
//! TOML datetimes are kept as [`document::datetime`] values so they are written
//! back as datetimes. JSON output renders them as strings.

use std::{error::Error, fmt, fs, path::Path};

use serde_json::Value;

use crate::{
    document::{self, Document},
    error::{Result, SpanError},
};

type BoxError = Box<dyn Error + Send + Sync>;

/// An encode/decode pair for one file format.
pub trait Codec: fmt::Debug + Send + Sync {
    /// Extension handled by this codec, without the leading dot.
    fn extension(&self) -> &'static str;

    fn decode(&self, content: &str) -> Result<Document, BoxError>;

    fn encode(&self, doc: &Document) -> Result<String, BoxError>;
}

#[derive(Debug)]
pub struct TomlCodec;

impl Codec for TomlCodec {
    fn extension(&self) -> &'static str {
        "toml"
    }

    fn decode(&self, content: &str) -> Result<Document, BoxError> {
        let table: toml::Table = toml::from_str(content)?;
        Ok(table.into_iter().map(|(k, v)| (k, from_toml(v))).collect())
    }

    fn encode(&self, doc: &Document) -> Result<String, BoxError> {
        Ok(toml::to_string(&to_toml_table(doc)?)?)
    }
}

fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => document::datetime(dt.to_string()),
        toml::Value::Array(values) => Value::Array(values.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(k, v)| (k, from_toml(v))).collect())
        }
    }
}

fn to_toml_table(map: &Document) -> Result<toml::Table, BoxError> {
    let mut table = toml::Table::new();
    for (k, v) in map {
        table.insert(k.clone(), to_toml(v)?);
    }
    Ok(table)
}

fn to_toml(value: &Value) -> Result<toml::Value, BoxError> {
    if let Some(text) = document::as_datetime(value) {
        return Ok(toml::Value::Datetime(text.parse()?));
    }
    let value = match value {
        Value::Null => return Err("null has no TOML representation".into()),
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => toml::Value::Integer(i),
            None => toml::Value::Float(n.as_f64().ok_or("number out of range")?),
        },
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Array(values) => {
            toml::Value::Array(values.iter().map(to_toml).collect::<Result<_, _>>()?)
        }
        Value::Object(map) => toml::Value::Table(to_toml_table(map)?),
    };
    Ok(value)
}

/// JSON output is pretty-printed with 2-space indentation and a trailing newline.
#[derive(Debug)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn decode(&self, content: &str) -> Result<Document, BoxError> {
        Ok(serde_json::from_str(content)?)
    }

    fn encode(&self, doc: &Document) -> Result<String, BoxError> {
        let plain: Document = doc.iter().map(|(k, v)| (k.clone(), plain_json(v))).collect();
        let content = serde_json::to_string_pretty(&plain)?;
        Ok(format!("{}\n", content))
    }
}

fn plain_json(value: &Value) -> Value {
    if let Some(text) = document::as_datetime(value) {
        return Value::String(text.to_string());
    }
    match value {
        Value::Array(values) => Value::Array(values.iter().map(plain_json).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), plain_json(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

static CODECS: &[&dyn Codec] = &[&TomlCodec, &JsonCodec];

/// Find the codec for `path` by its extension.
pub fn find_codec(path: &Path) -> Result<&'static dyn Codec> {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    CODECS
        .iter()
        .copied()
        .find(|codec| codec.extension() == ext)
        .ok_or_else(|| {
            let shown = if ext.is_empty() {
                String::new()
            } else {
                format!(".{ext}")
            };
            SpanError::UnsupportedFormat(shown)
        })
}

/// Read and decode the document at `path`.
pub fn load_document(path: &Path) -> Result<Document> {
    let codec = find_codec(path)?;
    let content = fs::read_to_string(path).map_err(|e| SpanError::Io(path.to_path_buf(), e))?;
    codec.decode(&content).map_err(|source| SpanError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode `doc` with the codec for `path` and write it, creating parent
/// directories as needed.
///
/// The codec is resolved and the document encoded before anything touches
/// the filesystem.
pub fn write_document(path: &Path, doc: &Document) -> Result<()> {
    let codec = find_codec(path)?;
    let content = codec.encode(doc).map_err(|source| SpanError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SpanError::Io(parent.to_path_buf(), e))?;
    }
    fs::write(path, content).map_err(|e| SpanError::Io(path.to_path_buf(), e))
}
