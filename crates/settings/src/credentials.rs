//! Resolved credentials handed to the injectors.
//!
//! Responsibilities:
//! - Model the two credential shapes a settings entry can carry.
//! - Keep secret material out of `Debug` output.
//!
//! Does NOT handle:
//! - Looking credentials up in any store; callers resolve them first.
//!
//! Invariants:
//! - Passwords, private keys and passphrases are held in `secrecy` types and
//!   are only exposed at the point they are written into the document or a key file.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::{SecretBox, SecretSlice, SecretString};

/// Mapping from `<server>`/`<proxy>` id to the credential injected for it.
///
/// A `BTreeMap` keeps iteration in id order, so new server entries are
/// appended deterministically.
pub type CredentialMapping = BTreeMap<String, Credential>;

/// A credential resolved for a single settings entry.
#[derive(Debug)]
pub enum Credential {
    /// Written as `<username>` and `<password>`.
    UsernamePassword {
        username: String,
        password: SecretString,
    },
    /// Written as `<username>`, `<privateKey>` (path of a materialized key
    /// file) and an optional `<passphrase>`.
    UsernamePrivateKey {
        username: String,
        private_key: SecretSlice<u8>,
        passphrase: Option<SecretString>,
    },
}

/// Discriminant of [`Credential`], safe to log and to embed in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    UsernamePassword,
    UsernamePrivateKey,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsernamePassword => f.write_str("username/password"),
            Self::UsernamePrivateKey => f.write_str("username/private key"),
        }
    }
}

impl Credential {
    /// Build a username/password credential.
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        let password: String = password.into();
        Self::UsernamePassword {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }

    /// Build a username/private key credential.
    ///
    /// Blank passphrases are treated as absent.
    pub fn private_key(
        username: impl Into<String>,
        private_key: impl Into<Vec<u8>>,
        passphrase: Option<String>,
    ) -> Self {
        let private_key: Vec<u8> = private_key.into();
        Self::UsernamePrivateKey {
            username: username.into(),
            private_key: SecretBox::new(private_key.into_boxed_slice()),
            passphrase: passphrase
                .filter(|p| !p.trim().is_empty())
                .map(|p| SecretString::new(p.into())),
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Self::UsernamePassword { username, .. } | Self::UsernamePrivateKey { username, .. } => {
                username
            }
        }
    }

    pub fn kind(&self) -> CredentialKind {
        match self {
            Self::UsernamePassword { .. } => CredentialKind::UsernamePassword,
            Self::UsernamePrivateKey { .. } => CredentialKind::UsernamePrivateKey,
        }
    }
}
