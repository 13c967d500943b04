//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `MVN_SETTINGS_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//! - Provide helper functions for reading env vars with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - Building the final InjectConfig (see builder.rs).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Values set through builder methods are never overwritten.
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid boolean values return ConfigError::InvalidValue.

use std::path::PathBuf;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::constants::{ENV_CREDENTIALS, ENV_REPLACE_ALL, ENV_SCRATCH_DIR};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse a boolean flag, accepting `true`/`false`/`1`/`0` in any case.
fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: "must be true or false".to_string(),
        }),
    }
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if loader.scratch_dir().is_none()
        && let Some(dir) = env_var_or_none(ENV_SCRATCH_DIR)
    {
        loader.set_scratch_dir(Some(PathBuf::from(dir)));
    }
    if loader.replace_all().is_none()
        && let Some(value) = env_var_or_none(ENV_REPLACE_ALL)
    {
        loader.set_replace_all(Some(parse_bool(ENV_REPLACE_ALL, &value)?));
    }
    if loader.credentials_path().is_none()
        && let Some(path) = env_var_or_none(ENV_CREDENTIALS)
    {
        loader.set_credentials_path(Some(PathBuf::from(path)));
    }

    Ok(())
}
