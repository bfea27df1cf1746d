use std::process::ExitCode;

use clap::Parser;
use span::cli::{Arguments, ExitStatus};

fn main() -> ExitCode {
    let args = Arguments::parse();

    match span::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            span::cli::print_error(&err);
            ExitStatus::Error.into()
        }
    }
}
