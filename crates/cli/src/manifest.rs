//! Manifest of materialized key files.
//!
//! `inject --manifest` records every key file it leaves behind so that a
//! later `cleanup --manifest` can remove them once the build is done.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::output::write_to_file;

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    /// Absolute paths of materialized key files.
    pub temp_files: Vec<PathBuf>,
}

impl Manifest {
    pub fn new(temp_files: Vec<PathBuf>) -> Self {
        Self { temp_files }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;
        write_to_file(&json, path)
    }
}
