//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `SettingsError`, `ConfigError`, I/O and JSON errors to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.

use std::io::ErrorKind;

use mvn_settings::SettingsError;
use mvn_settings_config::ConfigError;

/// Structured exit codes for mvn-settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// An input file (settings, credentials, key file, manifest) does not exist.
    NotFound = 4,

    /// Validation error - malformed settings document, bad credentials file,
    /// or invalid configuration value.
    ///
    /// Scripts should fix the input and not retry.
    ValidationError = 5,

    /// Permission denied, or key files could not be materialized.
    PermissionDenied = 6,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&SettingsError> for ExitCode {
    fn from(err: &SettingsError) -> Self {
        match err {
            SettingsError::MalformedDocument { .. } => ExitCode::ValidationError,
            SettingsError::InvalidCharacter { .. } => ExitCode::ValidationError,
            SettingsError::UnsupportedCredentialKind { .. } => ExitCode::ValidationError,
            SettingsError::MaterializationFailure { .. } => ExitCode::PermissionDenied,
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::CredentialsRead { source, .. }
            | ConfigError::KeyFileRead { source, .. } => Self::from(source.kind()),
            ConfigError::InvalidValue { .. }
            | ConfigError::InvalidCredential { .. }
            | ConfigError::CredentialsParse { .. }
            | ConfigError::DotenvParse { .. } => ExitCode::ValidationError,
            ConfigError::ScratchDirUnavailable(_)
            | ConfigError::DotenvIo { .. }
            | ConfigError::DotenvUnknown => ExitCode::GeneralError,
        }
    }
}

impl From<ErrorKind> for ExitCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => ExitCode::NotFound,
            ErrorKind::PermissionDenied => ExitCode::PermissionDenied,
            _ => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no known error type is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<SettingsError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<ConfigError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<std::io::Error>() {
                return ExitCode::from(err.kind());
            }
            if cause.is::<serde_json::Error>() {
                return ExitCode::ValidationError;
            }
        }

        ExitCode::GeneralError
    }
}
