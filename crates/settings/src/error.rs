//! Error types for settings injection.
//!
//! Invariants:
//! - Error messages never include credential material (passwords, keys, passphrases).
//! - `MaterializationFailure` is only returned after the files written during
//!   the failing call have been removed.

use std::path::PathBuf;
use thiserror::Error;

use crate::credentials::CredentialKind;

/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors that can occur while injecting credentials into a settings document.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The input is not well-formed XML, or its root is not `<settings>`.
    #[error("Malformed settings document: {reason}")]
    MalformedDocument { reason: String },

    /// A key file could not be written to the scratch directory.
    #[error("Failed to materialize credential file in {path}: {source}")]
    MaterializationFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A credential value contains a character XML 1.0 does not allow.
    ///
    /// Only the entry id and the field name are reported, never the value.
    #[error("Credential for '{id}' has a character not allowed in XML in <{field}>")]
    InvalidCharacter { id: String, field: &'static str },

    /// The credential kind cannot be expressed on the target element.
    #[error("Credential for '{id}' is a {kind} credential, which <{element}> does not support")]
    UnsupportedCredentialKind {
        id: String,
        kind: CredentialKind,
        element: &'static str,
    },
}

impl SettingsError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            reason: reason.into(),
        }
    }
}
