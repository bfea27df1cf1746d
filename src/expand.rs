//! Cartesian expansion of array-valued variables.
//!
//! The engine walks the product depth first over one shared document. Each
//! level takes the arrays of its bind group out of the document, substitutes
//! one element per iteration, recurses, and puts the arrays back before
//! returning, so sibling branches never observe each other's changes.

use serde_json::Value;

use crate::{
    binding::{Bindings, reduce_to_representatives},
    document::{self, Document},
    error::{Result, SpanError},
    key::Key,
    template::{Template, extract_keys},
};

/// Receives every fully expanded document.
///
/// The document may be modified temporarily but must be left as it was found.
pub trait Sink {
    fn emit(&mut self, doc: &mut Document) -> Result<()>;
}

impl<F> Sink for F
where
    F: FnMut(&mut Document) -> Result<()>,
{
    fn emit(&mut self, doc: &mut Document) -> Result<()> {
        self(doc)
    }
}

/// A generation run, built once from the command line.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Template for the path of each generated file.
    pub output: Template,
    /// Keys driving the expansion, one per bind group.
    pub expand: Vec<Key>,
    /// Keys whose string values are templates rendered at each leaf.
    pub render: Vec<Key>,
    pub bindings: Bindings,
}

impl Plan {
    /// Compile the output path and derive the expand set from its placeholders.
    pub fn new(
        output: &str,
        render: impl IntoIterator<Item = Key>,
        bindings: Bindings,
    ) -> Result<Self> {
        let template = Template::compile(output)?;
        let expand = reduce_to_representatives(extract_keys(output)?, &bindings);

        let mut unique = Vec::new();
        for key in render {
            if !unique.contains(&key) {
                unique.push(key);
            }
        }

        Ok(Self {
            output: template,
            expand,
            render: unique,
            bindings,
        })
    }

    /// Compile every render-set value present in `doc` so syntax errors
    /// surface before any file is written.
    pub fn check_render_templates(&self, doc: &Document) -> Result<()> {
        for key in &self.render {
            match document::get(doc, key)? {
                Value::String(s) => {
                    Template::compile(s)?;
                }
                Value::Array(values) => {
                    for value in values {
                        let Value::String(s) = value else {
                            return Err(SpanError::ExpectedString(key.clone()));
                        };
                        Template::compile(s)?;
                    }
                }
                _ => return Err(SpanError::ExpectedString(key.clone())),
            }
        }
        Ok(())
    }

    /// Expand `doc` and hand every combination to `sink`.
    pub fn run<S: Sink + ?Sized>(&self, doc: &mut Document, sink: &mut S) -> Result<()> {
        expand(doc, &self.expand, &self.bindings, sink)
    }
}

/// Recursively expand `keys` over `doc`.
///
/// Stops at the first error. `doc` is restored before returning, whether or
/// not an error occurred.
pub fn expand<S: Sink + ?Sized>(
    doc: &mut Document,
    keys: &[Key],
    bindings: &Bindings,
    sink: &mut S,
) -> Result<()> {
    let Some((head, rest)) = keys.split_first() else {
        return sink.emit(doc);
    };

    let group = bindings.find(head);
    let len = array_len(doc, head)?;
    for key in group.iter().filter(|k| *k != head) {
        let bound_len = array_len(doc, key)?;
        if bound_len != len {
            return Err(SpanError::LengthMismatch {
                key: head.clone(),
                len,
                bound: key.clone(),
                bound_len,
            });
        }
    }

    let mut columns: Vec<(&Key, Vec<Value>)> = Vec::with_capacity(group.len());
    let result = take_columns(doc, &group, &mut columns).and_then(|()| {
        for j in 0..len {
            for (key, values) in &columns {
                document::set(doc, key, values[j].clone())?;
            }
            expand(doc, rest, bindings, sink)?;
        }
        Ok(())
    });

    // restore in reverse order of removal
    let mut restored = Ok(());
    for (key, values) in columns.into_iter().rev() {
        restored = restored.and(document::set(doc, key, Value::Array(values)));
    }
    result.and(restored)
}

fn array_len(doc: &Document, key: &Key) -> Result<usize> {
    match document::get(doc, key)? {
        Value::Array(values) => Ok(values.len()),
        _ => Err(SpanError::ExpectedArray(key.clone())),
    }
}

/// Move the arrays of `group` out of `doc`, leaving nulls behind.
fn take_columns<'k>(
    doc: &mut Document,
    group: &'k [Key],
    columns: &mut Vec<(&'k Key, Vec<Value>)>,
) -> Result<()> {
    for key in group {
        match document::replace(doc, key, Value::Null)? {
            Value::Array(values) => columns.push((key, values)),
            other => {
                document::set(doc, key, other)?;
                return Err(SpanError::ExpectedArray(key.clone()));
            }
        }
    }
    Ok(())
}
