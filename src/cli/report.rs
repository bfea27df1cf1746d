//! Console output for the command-line layer.
//!
//! Kept apart from the run loop so the library can be used without printing.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;

use super::run::RunSummary;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Print one generated path to stdout.
pub fn print_path(path: &Path) {
    print_path_to(path, &mut io::stdout().lock());
}

pub fn print_path_to<W: Write>(path: &Path, writer: &mut W) {
    let _ = writeln!(writer, "{}", path.display());
}

/// Print the closing summary line to stdout.
pub fn print_summary(summary: &RunSummary) {
    print_summary_to(summary, &mut io::stdout().lock());
}

pub fn print_summary_to<W: Write>(summary: &RunSummary, writer: &mut W) {
    let verb = if summary.dry_run {
        "Would generate"
    } else {
        "Generated"
    };
    let noun = if summary.generated == 1 {
        "file"
    } else {
        "files"
    };
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!("{verb} {} {noun}", summary.generated).green()
    );
}

/// Print an error and its causes to stderr.
pub fn print_error(err: &anyhow::Error) {
    print_error_to(err, &mut io::stderr().lock());
}

pub fn print_error_to<W: Write>(err: &anyhow::Error, writer: &mut W) {
    let _ = writeln!(writer, "{} {:#}", "Error:".bold().red(), err);
}
