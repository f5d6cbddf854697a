//! Input selection shared by every command

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::{Path, PathBuf};
use wirekit_codegen::{Config, parse_file};

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG: &str = "wirekit.toml";

#[derive(Debug, Default, Args)]
pub struct SourceArgs {
    /// Rust source file to scan (repeatable)
    #[arg(short, long = "input", value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Path to wirekit.toml (default: ./wirekit.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl SourceArgs {
    /// Load the configuration and apply command-line inputs on top
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => load(path)?,
            None if Path::new(DEFAULT_CONFIG).is_file() => load(Path::new(DEFAULT_CONFIG))?,
            None => Config::new(),
        };

        apply_inputs(&mut config, &self.inputs);
        if config.inputs.is_empty() {
            bail!("No input files: pass --input or list `inputs` in {DEFAULT_CONFIG}");
        }
        Ok(config)
    }
}

fn load(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Inputs given on the command line replace the configured ones
fn apply_inputs(config: &mut Config, inputs: &[PathBuf]) {
    if !inputs.is_empty() {
        config.inputs = inputs.to_vec();
    }
}

/// Parse every configured input
pub fn parse_inputs(config: &Config) -> Result<Vec<syn::File>> {
    config
        .inputs
        .iter()
        .map(|path| {
            parse_file(path).with_context(|| format!("Failed to read source: {}", path.display()))
        })
        .collect()
}
