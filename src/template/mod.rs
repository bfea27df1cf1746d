//! Placeholder templates: `{key}` and `{key|format}`.
//!
//! Templates are compiled once, then rendered against a document as often as
//! needed. Keys use the grammar from [`crate::key`], formats are printf-style
//! (see [`format`]).

pub mod format;

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use self::format::Format;
use crate::{
    document::{self, Document},
    error::{Result, SpanError},
    key::{Key, parse_key},
};

// Capture group 1: key text; group 2: optional format after `|`
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}|]+)(?:\|([^{}]+))?\}").unwrap());

#[derive(Debug, Clone)]
enum Part {
    Literal(String),
    Placeholder { key: Key, format: Option<(String, Format)> },
}

/// A compiled placeholder template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    parts: Vec<Part>,
}

impl Template {
    /// Compile a template string.
    ///
    /// Fails on malformed keys, invalid formats, or braces that do not belong
    /// to a placeholder.
    pub fn compile(s: &str) -> Result<Self> {
        let mut parts = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER_REGEX.captures_iter(s) {
            let (Some(whole), Some(key_text)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_literal(&mut parts, s, &s[last..whole.start()])?;
            last = whole.end();

            let key = parse_key(key_text.as_str()).map_err(|e| SpanError::syntax(s, e.to_string()))?;
            let format = match caps.get(2) {
                Some(f) => {
                    let parsed = Format::parse(f.as_str()).map_err(|reason| {
                        SpanError::syntax(s, format!("invalid format {:?}: {reason}", f.as_str()))
                    })?;
                    Some((f.as_str().to_string(), parsed))
                }
                None => None,
            };
            parts.push(Part::Placeholder { key, format });
        }
        push_literal(&mut parts, s, &s[last..])?;

        Ok(Self {
            source: s.to_string(),
            parts,
        })
    }

    /// Render against `doc`, resolving every placeholder.
    pub fn render(&self, doc: &Document) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Placeholder { key, format: None } => {
                    out.push_str(&stringify(document::get(doc, key)?));
                }
                Part::Placeholder {
                    key,
                    format: Some((text, format)),
                } => {
                    let value = document::get(doc, key)?;
                    let rendered = format.apply(value).map_err(|reason| SpanError::Format {
                        key: key.clone(),
                        format: text.clone(),
                        reason,
                    })?;
                    out.push_str(&rendered);
                }
            }
        }
        Ok(out)
    }

    /// Keys referenced by placeholders, in order of appearance.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.parts.iter().filter_map(|part| match part {
            Part::Placeholder { key, .. } => Some(key),
            Part::Literal(_) => None,
        })
    }
}

fn push_literal(parts: &mut Vec<Part>, template: &str, text: &str) -> Result<()> {
    if text.contains(['{', '}']) {
        return Err(SpanError::syntax(template, "unbalanced braces"));
    }
    if !text.is_empty() {
        parts.push(Part::Literal(text.to_string()));
    }
    Ok(())
}

/// Scan a string for placeholder keys without compiling it.
///
/// Keys are returned in order of first appearance; repeated keys are listed
/// once.
pub fn extract_keys(s: &str) -> Result<Vec<Key>> {
    let mut keys: Vec<Key> = Vec::new();
    for caps in PLACEHOLDER_REGEX.captures_iter(s) {
        let Some(key_text) = caps.get(1) else {
            continue;
        };
        let key = parse_key(key_text.as_str())?;
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    Ok(keys)
}

/// Plain `{key}` rendering of a value.
pub fn stringify(value: &Value) -> String {
    if let Some(text) = document::as_datetime(value) {
        return text.to_string();
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format::general(f, None, false),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
