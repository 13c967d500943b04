//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for layered configuration.
//! - Build the final `InjectConfig` from loaded values and defaults.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//!
//! Invariants / Assumptions:
//! - Builder methods take precedence over environment variables.
//! - `from_env()` never overwrites a value already set through a builder method.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

use std::path::PathBuf;

use super::defaults::default_scratch_dir;
use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{DEFAULT_REPLACE_ALL, ENV_DOTENV_DISABLED};
use crate::types::InjectConfig;

/// Configuration loader that builds config from explicit settings and the environment.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    scratch_dir: Option<PathBuf>,
    replace_all: Option<bool>,
    credentials_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var(ENV_DOTENV_DISABLED).ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from environment variables.
    ///
    /// Values already set through builder methods are kept.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the scratch directory for materialized keys.
    pub fn with_scratch_dir(mut self, dir: PathBuf) -> Self {
        self.scratch_dir = Some(dir);
        self
    }

    /// Set replace-all (`true`) or merge-only (`false`) server injection.
    pub fn with_replace_all(mut self, replace_all: bool) -> Self {
        self.replace_all = Some(replace_all);
        self
    }

    /// Set the credentials file path.
    pub fn with_credentials_path(mut self, path: PathBuf) -> Self {
        self.credentials_path = Some(path);
        self
    }

    /// Build the final configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::ScratchDirUnavailable` when no scratch dir was
    /// configured and the platform cache directory cannot be determined.
    pub fn build(self) -> Result<InjectConfig, ConfigError> {
        let scratch_dir = match self.scratch_dir {
            Some(dir) => dir,
            None => default_scratch_dir()?,
        };

        Ok(InjectConfig {
            scratch_dir,
            replace_all: self.replace_all.unwrap_or(DEFAULT_REPLACE_ALL),
            credentials_path: self.credentials_path,
        })
    }

    // Internal accessor methods for use by other loader modules

    pub(crate) fn scratch_dir(&self) -> Option<&PathBuf> {
        self.scratch_dir.as_ref()
    }

    pub(crate) fn replace_all(&self) -> Option<bool> {
        self.replace_all
    }

    pub(crate) fn credentials_path(&self) -> Option<&PathBuf> {
        self.credentials_path.as_ref()
    }

    pub(crate) fn set_scratch_dir(&mut self, dir: Option<PathBuf>) {
        self.scratch_dir = dir;
    }

    pub(crate) fn set_replace_all(&mut self, replace_all: Option<bool>) {
        self.replace_all = replace_all;
    }

    pub(crate) fn set_credentials_path(&mut self, path: Option<PathBuf>) {
        self.credentials_path = path;
    }
}
