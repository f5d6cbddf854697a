//! Build collaborators that receive generated units

use crate::driver::GeneratedUnit;
use crate::error::CodegenError;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receives each generated unit exactly once per run
pub trait UnitSink {
    /// Take ownership of a unit. A second unit with the same name is an
    /// error.
    fn accept(&mut self, unit: GeneratedUnit) -> Result<(), CodegenError>;
}

/// Keeps units in memory, keyed by unit name
#[derive(Debug, Default)]
pub struct MemorySink {
    units: BTreeMap<String, GeneratedUnit>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&GeneratedUnit> {
        self.units.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    /// Units sorted by name
    pub fn units(&self) -> impl Iterator<Item = &GeneratedUnit> {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn into_units(self) -> Vec<GeneratedUnit> {
        self.units.into_values().collect()
    }
}

impl UnitSink for MemorySink {
    fn accept(&mut self, unit: GeneratedUnit) -> Result<(), CodegenError> {
        if self.units.contains_key(&unit.name) {
            return Err(CodegenError::DuplicateUnit(unit.name));
        }
        self.units.insert(unit.name.clone(), unit);
        Ok(())
    }
}

/// Writes each unit to `{dir}/{name}.rs`
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: HashSet<String>,
}

impl DirectorySink {
    /// Create the sink, creating `dir` if it does not exist
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CodegenError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| CodegenError::io(&dir, e))?;
        Ok(Self {
            dir,
            written: HashSet::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a unit with this name is written to
    pub fn path_for(&self, unit_name: &str) -> PathBuf {
        self.dir.join(format!("{unit_name}.rs"))
    }

    pub fn written(&self) -> usize {
        self.written.len()
    }
}

impl UnitSink for DirectorySink {
    fn accept(&mut self, unit: GeneratedUnit) -> Result<(), CodegenError> {
        if !self.written.insert(unit.name.clone()) {
            return Err(CodegenError::DuplicateUnit(unit.name));
        }
        let path = self.path_for(&unit.name);
        fs::write(&path, unit.source.as_bytes()).map_err(|e| CodegenError::io(&path, e))?;
        debug!(path = %path.display(), "wrote unit");
        Ok(())
    }
}
