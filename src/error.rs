//! Error types shared by the expansion core.

use std::path::PathBuf;

use thiserror::Error;

use crate::key::Key;

pub type Result<T, E = SpanError> = std::result::Result<T, E>;

/// Everything that can abort a generation run.
#[derive(Debug, Error)]
pub enum SpanError {
    #[error("malformed key {input:?}: {reason}")]
    MalformedKey { input: String, reason: &'static str },

    #[error("variable {0} is already bound")]
    DuplicateBinding(Key),

    #[error("expected array at key {0}")]
    ExpectedArray(Key),

    #[error("array length mismatch: {key} has {len} values but {bound} has {bound_len}")]
    LengthMismatch {
        key: Key,
        len: usize,
        bound: Key,
        bound_len: usize,
    },

    #[error("template syntax error in {template:?}: {reason}")]
    TemplateSyntax { template: String, reason: String },

    #[error("cannot format {key} with {format:?}: {reason}")]
    Format {
        key: Key,
        format: String,
        reason: String,
    },

    #[error("key {key} not found: no segment {segment:?}")]
    MissingSegment { key: Key, segment: String },

    #[error("not a nested document at segment {segment:?} of key {key}")]
    NotADocument { key: Key, segment: String },

    #[error("expected string at key {0}")]
    ExpectedString(Key),

    #[error("unsupported file format {0:?}")]
    UnsupportedFormat(String),

    #[error("IO error when accessing `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to decode `{}`", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to encode `{}`", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SpanError {
    pub(crate) fn malformed(input: &str, reason: &'static str) -> Self {
        Self::MalformedKey {
            input: input.to_string(),
            reason,
        }
    }

    pub(crate) fn syntax(template: &str, reason: impl Into<String>) -> Self {
        Self::TemplateSyntax {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}
