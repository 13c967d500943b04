//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for configuration and credentials file failures.
//!
//! Does NOT handle:
//! - Errors raised while injecting (see `mvn_settings::SettingsError`).
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, paths, entry ids).
//! - Credentials and dotenv errors NEVER include raw file contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Unable to determine cache directory for the default scratch dir: {0}")]
    ScratchDirUnavailable(String),

    #[error("Failed to read credentials file at {path}")]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SAFETY: only the position is kept, never the offending content.
    #[error("Failed to parse credentials file at {path} (line {line}, column {column})")]
    CredentialsParse {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("Invalid credential '{id}': {message}")]
    InvalidCredential { id: String, message: String },

    #[error("Failed to read private key file for '{id}' at {path}")]
    KeyFileRead {
        id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}

impl ConfigError {
    /// Whether the error stems from a file that does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::CredentialsRead { source, .. } | Self::KeyFileRead { source, .. } => {
                source.kind() == ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
