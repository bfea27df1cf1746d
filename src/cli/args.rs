//! CLI argument definitions using clap.
//!
//! Keys and bind groups are parsed with the key grammar while the command line
//! is read, so a malformed key is reported as a usage error.

use std::path::PathBuf;

use clap::Parser;

use crate::{binding::KeyGroup, key::Key};

const AFTER_HELP: &str = "\
Example:
  span -b width,height -r output.dir \\
      '{simulation.mode}/{width}x{height}_{size|%03d}.toml' config.toml

  Every array referenced in OUTPUT is expanded; bound arrays advance together.";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None, after_help = AFTER_HELP)]
pub struct Arguments {
    /// Path template for generated files, e.g. "{mode}/{size|%03d}.toml"
    #[arg(value_name = "OUTPUT")]
    pub output: String,

    /// Input configuration file (.toml or .json)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Render the template stored at KEY in every generated file (repeatable)
    #[arg(short, long, value_name = "KEY")]
    pub render: Vec<Key>,

    /// Expand the given keys together instead of as a product (repeatable)
    #[arg(short, long, value_name = "KEY,KEY,...")]
    pub bind: Vec<KeyGroup>,

    /// Print every generated path
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the paths that would be generated without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}
