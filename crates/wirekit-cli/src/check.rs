//! `wirekit check`

use crate::sources::{SourceArgs, parse_inputs};
use anyhow::{Result, bail};
use std::fmt::Write as _;
use wirekit_codegen::{MemorySink, Report};

pub fn run(sources: &SourceArgs) -> Result<()> {
    let config = sources.load_config()?;
    let files = parse_inputs(&config)?;

    let mut sink = MemorySink::new();
    let report = config.generator()?.run(&files, &mut sink)?;

    print!("{}", summarize(&report));

    if !report.is_complete() {
        bail!("{} message(s) failed code generation", report.failures.len());
    }
    Ok(())
}

/// One line per declaration: accepted units, then skips, then failures
pub fn summarize(report: &Report) -> String {
    let mut out = String::new();

    for name in &report.emitted {
        let _ = writeln!(out, "ok       {name}");
    }
    for skipped in &report.skipped {
        let _ = writeln!(out, "skipped  {}: {}", skipped.qualified_name(), skipped.reason);
    }
    for failure in &report.failures {
        let _ = writeln!(out, "failed   {}", failure.error);
    }

    let _ = writeln!(
        out,
        "\n{} ok, {} skipped, {} failed",
        report.emitted.len(),
        report.skipped.len(),
        report.failures.len()
    );
    out
}
