//! Span - cartesian expansion of templated configuration files
//!
//! Span reads one configuration document (TOML or JSON) in which some values
//! are arrays, and writes one file per combination of array elements. The
//! output path is a template such as `{mode}/{width}x{height}_{size|%03d}.toml`;
//! every key it references is expanded, and keys bound together with
//! `--bind` advance in lockstep instead of forming a product.
//!
//! ```
//! use serde_json::json;
//! use span::{binding::Bindings, document::Document, expand::Plan};
//!
//! let serde_json::Value::Object(mut doc) = json!({"mode": ["a", "b"], "size": [1, 2, 3]}) else {
//!     unreachable!()
//! };
//! let plan = Plan::new("{mode}/{size}.toml", [], Bindings::default()).unwrap();
//! let mut paths = Vec::new();
//! let mut sink = |leaf: &mut Document| -> span::error::Result<()> {
//!     paths.push(plan.output.render(leaf)?);
//!     Ok(())
//! };
//! plan.run(&mut doc, &mut sink).unwrap();
//! assert_eq!(paths.len(), 6);
//! assert_eq!(paths[0], "a/1.toml");
//! ```
//!
//! ## Module Structure
//!
//! - `key`: key grammar (`a.b`, `"quoted segment".c`)
//! - `binding`: bind groups and expansion representatives
//! - `document`: key-path access into a decoded document
//! - `template`: placeholder templates and printf-style formats
//! - `expand`: the expansion engine and run plan
//! - `writer`: per-leaf rendering and file output
//! - `codec`: TOML and JSON readers and writers
//! - `cli`: command-line interface layer

pub mod binding;
pub mod cli;
pub mod codec;
pub mod document;
pub mod error;
pub mod expand;
pub mod key;
pub mod template;
pub mod writer;
