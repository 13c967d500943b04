//! `cleanup` command: remove key files recorded by `inject --manifest`.
//!
//! Files that are already gone count as cleaned up. If any file cannot be
//! removed the manifest is kept so the cleanup can be retried.

use std::path::Path;

use anyhow::{Context, Result, bail};

use super::inject::remove_file;
use crate::manifest::Manifest;

pub fn run(manifest_path: &Path) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;

    let mut removed = 0usize;
    let mut failed = 0usize;
    for path in &manifest.temp_files {
        match remove_file(path) {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => {
                failed += 1;
                eprintln!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }

    if failed > 0 {
        bail!(
            "Failed to remove {failed} key file(s); manifest kept at {}",
            manifest_path.display()
        );
    }

    std::fs::remove_file(manifest_path)
        .with_context(|| format!("Failed to remove manifest: {}", manifest_path.display()))?;

    tracing::debug!(removed, listed = manifest.temp_files.len(), "Cleanup finished");
    eprintln!(
        "Removed {removed} of {} key file(s)",
        manifest.temp_files.len()
    );
    Ok(())
}
