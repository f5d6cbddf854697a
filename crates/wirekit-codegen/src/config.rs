//! Generator configuration and the `build.rs` entry point

use crate::driver::{DEFAULT_RUNTIME_PATH, Generator, Report, parse_file};
use crate::error::CodegenError;
use crate::sink::DirectorySink;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Code generation settings
///
/// Loaded from `wirekit.toml` by the CLI or built in `build.rs`:
///
/// ```no_run
/// // build.rs
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     wirekit_codegen::Config::new().compile(&["src/model.rs"])?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path generated units use to reach the runtime crate
    pub runtime_path: String,

    /// Output directory; `$OUT_DIR` when unset
    pub out_dir: Option<PathBuf>,

    /// Source files to scan
    pub inputs: Vec<PathBuf>,

    /// Print `cargo:rerun-if-changed` for each input
    pub emit_rerun_if_changed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            out_dir: None,
            inputs: Vec::new(),
            emit_rerun_if_changed: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `wirekit.toml` document
    pub fn from_toml_str(text: &str) -> Result<Self, CodegenError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a `wirekit.toml` file.
    ///
    /// Relative `inputs` and `out_dir` are resolved against the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self, CodegenError> {
        let text = fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        let mut config = Self::from_toml_str(&text)?;

        if let Some(base) = path.parent() {
            for input in &mut config.inputs {
                if input.is_relative() {
                    *input = base.join(&*input);
                }
            }
            if let Some(out_dir) = &mut config.out_dir
                && out_dir.is_relative()
            {
                *out_dir = base.join(&*out_dir);
            }
        }

        Ok(config)
    }

    pub fn with_runtime_path(mut self, runtime_path: impl Into<String>) -> Self {
        self.runtime_path = runtime_path.into();
        self
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(out_dir.into());
        self
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.inputs.push(input.into());
        self
    }

    pub fn with_rerun_if_changed(mut self, emit: bool) -> Self {
        self.emit_rerun_if_changed = emit;
        self
    }

    /// The configured output directory, else `$OUT_DIR`
    pub fn resolve_out_dir(&self) -> Result<PathBuf, CodegenError> {
        if let Some(out_dir) = &self.out_dir {
            return Ok(out_dir.clone());
        }
        std::env::var_os("OUT_DIR")
            .map(PathBuf::from)
            .ok_or_else(|| {
                CodegenError::Config("no out_dir configured and OUT_DIR is not set".into())
            })
    }

    pub fn generator(&self) -> Result<Generator, CodegenError> {
        Generator::with_runtime_path(&self.runtime_path)
    }

    /// Generate units for `inputs` plus the configured inputs and write them
    /// to the output directory.
    ///
    /// Every unit that can be generated is written before a failure is
    /// reported, so one broken message does not hide the others' output.
    pub fn compile<P: AsRef<Path>>(&self, inputs: &[P]) -> Result<Report, CodegenError> {
        let paths: Vec<&Path> = self
            .inputs
            .iter()
            .map(PathBuf::as_path)
            .chain(inputs.iter().map(|p| p.as_ref()))
            .collect();

        let mut files = Vec::with_capacity(paths.len());
        for path in &paths {
            if self.emit_rerun_if_changed {
                println!("cargo:rerun-if-changed={}", path.display());
            }
            files.push(parse_file(path)?);
        }

        let generator = self.generator()?;
        let mut sink = DirectorySink::new(self.resolve_out_dir()?)?;
        let report = generator.run(&files, &mut sink)?;

        if !report.is_complete() {
            return Err(CodegenError::Incomplete {
                failures: report.failure_lines(),
            });
        }
        Ok(report)
    }
}
