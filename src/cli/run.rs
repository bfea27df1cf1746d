use anyhow::{Context, Result};

use super::{args::Arguments, report};
use crate::{binding::Bindings, codec, expand::Plan, writer::OutputWriter};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub generated: usize,
    pub dry_run: bool,
}

/// Load the input, expand it, and write (or list) every generated file.
///
/// Files written before an error stay on disk.
pub fn run(args: Arguments) -> Result<RunSummary> {
    let bindings = Bindings::new(args.bind).context("Invalid --bind arguments")?;
    let plan =
        Plan::new(&args.output, args.render, bindings).context("Invalid output path template")?;

    let mut doc = codec::load_document(&args.input)?;
    plan.check_render_templates(&doc).context("Invalid --render value")?;

    let mut writer = OutputWriter::new(&plan).dry_run(args.dry_run);
    if args.verbose || args.dry_run {
        writer = writer.on_write(report::print_path);
    }
    plan.run(&mut doc, &mut writer)
        .with_context(|| format!("Failed to expand {}", args.input.display()))?;

    Ok(RunSummary {
        generated: writer.generated().len(),
        dry_run: args.dry_run,
    })
}
