//! Temp credential materialization.
//!
//! Responsibilities:
//! - Write key material to uniquely named files inside a caller-provided scratch directory.
//! - Track the files written during one injection call and remove them if the call fails.
//!
//! Does NOT handle:
//! - Creating or garbage-collecting the scratch directory itself.
//! - Deleting files after a successful call; ownership passes to the caller.
//!
//! Invariants:
//! - File names are `<sanitized hint>-<random>.key`, so concurrent calls sharing a
//!   directory never collide and a hint can never escape the directory.
//! - Files are created by `tempfile`, which uses mode `0600` on unix.
//! - Returned paths are absolute.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::constants::{KEY_FILE_RANDOM_LEN, KEY_FILE_SUFFIX};
use crate::error::{Result, SettingsError};

/// Write `content` to a new uniquely named file under `scratch_dir`.
///
/// # Errors
/// Returns [`SettingsError::MaterializationFailure`] if the directory does not
/// exist, is not writable, or the content cannot be written. No file is left
/// behind in that case.
pub fn materialize(scratch_dir: &Path, content: &[u8], naming_hint: &str) -> Result<PathBuf> {
    let failure = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| SettingsError::MaterializationFailure { path, source }
    };

    let dir = std::fs::canonicalize(scratch_dir).map_err(failure(scratch_dir))?;
    let prefix = format!("{}-", sanitize_hint(naming_hint));

    let mut file = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(KEY_FILE_SUFFIX)
        .rand_bytes(KEY_FILE_RANDOM_LEN)
        .tempfile_in(&dir)
        .map_err(failure(&dir))?;

    file.write_all(content)
        .and_then(|()| file.as_file().sync_all())
        .map_err(failure(file.path()))?;

    let (_, path) = file
        .keep()
        .map_err(|e| SettingsError::MaterializationFailure {
            path: dir.clone(),
            source: e.error,
        })?;

    tracing::debug!(path = %path.display(), "Materialized credential file");
    Ok(path)
}

/// Keep a file name fragment to `[A-Za-z0-9._-]`.
fn sanitize_hint(hint: &str) -> String {
    let sanitized: String = hint
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match sanitized.trim_matches('.') {
        "" => "credential".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Files written during a single injection call.
///
/// Dropping the registry removes every recorded file. Call
/// [`MaterializedFiles::into_paths`] to hand the files over instead.
#[derive(Debug, Default)]
pub struct MaterializedFiles {
    paths: Vec<PathBuf>,
}

impl MaterializedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// [`materialize`] and record the resulting file.
    pub fn materialize(
        &mut self,
        scratch_dir: &Path,
        content: &[u8],
        naming_hint: &str,
    ) -> Result<PathBuf> {
        let path = materialize(scratch_dir, content, naming_hint)?;
        self.paths.push(path.clone());
        Ok(path)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Give up ownership of the files without deleting them.
    pub fn into_paths(mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.paths)
    }
}

impl Drop for MaterializedFiles {
    fn drop(&mut self) {
        for path in &self.paths {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove materialized credential file"
                );
            }
        }
    }
}
