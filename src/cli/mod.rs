//! Command-line layer: arguments, the generation run, and console output.

use anyhow::Result;

pub use self::{args::Arguments, exit_status::ExitStatus, report::print_error};

mod args;
mod exit_status;
mod report;
mod run;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let summary = run::run(args)?;
    report::print_summary(&summary);
    Ok(ExitStatus::Success)
}
