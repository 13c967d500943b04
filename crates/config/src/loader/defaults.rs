//! Default values that depend on the platform.

use std::path::PathBuf;

use directories::ProjectDirs;

use super::error::ConfigError;
use crate::constants::{APP_NAME, SCRATCH_SUBDIR};

/// Default scratch directory: `<platform cache dir>/scratch`.
///
/// The directory is not created here.
pub fn default_scratch_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.cache_dir().join(SCRATCH_SUBDIR))
        .ok_or_else(|| {
            ConfigError::ScratchDirUnavailable("no home directory found for this user".to_string())
        })
}
