//! `wirekit generate`

use crate::sources::SourceArgs;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

pub fn run(sources: &SourceArgs, output: Option<PathBuf>, runtime_path: Option<String>) -> Result<()> {
    let mut config = sources.load_config()?;
    if let Some(output) = output {
        config.out_dir = Some(output);
    }
    if let Some(runtime_path) = runtime_path {
        config.runtime_path = runtime_path;
    }
    if config.out_dir.is_none() {
        bail!("No output directory: pass --output or set `out_dir` in the config file");
    }
    // Not running under cargo
    config.emit_rerun_if_changed = false;

    let report = config
        .compile::<&Path>(&[])
        .context("Code generation failed")?;

    let out_dir = config.resolve_out_dir()?;
    for name in &report.emitted {
        println!("  {}", out_dir.join(format!("{name}.rs")).display());
    }
    println!(
        "Generated {} unit(s), skipped {} declaration(s)",
        report.emitted.len(),
        report.skipped.len()
    );

    Ok(())
}
