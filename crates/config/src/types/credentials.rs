//! Credentials file format.
//!
//! Responsibilities:
//! - Deserialize the JSON credentials file into `secrecy` types.
//! - Resolve each entry into a [`mvn_settings::Credential`], reading key files if needed.
//!
//! Does NOT handle:
//! - Writing credentials files; they are produced by whatever provisions the build.
//!
//! Invariants:
//! - Secret values are never logged and never embedded in errors.
//! - Relative `private_key_file` paths resolve against the credentials file's directory.
//!
//! Example:
//! ```json
//! {
//!   "servers": {
//!     "my.server": { "type": "password", "username": "peter", "password": "secret" },
//!     "siteServer": { "type": "private_key", "username": "git", "private_key_file": "id_ed25519" }
//!   },
//!   "proxies": {
//!     "proxy1": { "type": "password", "username": "dan", "password": "pwd" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mvn_settings::{Credential, CredentialMapping};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::loader::ConfigError;

/// Deserializers for secret values.
mod secret_string {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.map(|s| SecretString::new(s.into())))
    }
}

/// A single credential entry in the credentials file.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSpec {
    /// Username and password.
    Password {
        username: String,
        #[serde(deserialize_with = "secret_string::deserialize")]
        password: SecretString,
    },
    /// Username and private key, given inline or as a file path.
    PrivateKey {
        username: String,
        #[serde(default, deserialize_with = "secret_string::deserialize_option")]
        private_key: Option<SecretString>,
        #[serde(default)]
        private_key_file: Option<PathBuf>,
        #[serde(default, deserialize_with = "secret_string::deserialize_option")]
        passphrase: Option<SecretString>,
    },
}

impl CredentialSpec {
    /// Resolve into an injector credential.
    ///
    /// `base_dir` anchors relative `private_key_file` paths.
    pub fn resolve(&self, id: &str, base_dir: &Path) -> Result<Credential, ConfigError> {
        match self {
            Self::Password { username, password } => Ok(Credential::password(
                username.as_str(),
                password.expose_secret(),
            )),
            Self::PrivateKey {
                username,
                private_key,
                private_key_file,
                passphrase,
            } => {
                let key = match (private_key, private_key_file) {
                    (Some(inline), None) => inline.expose_secret().as_bytes().to_vec(),
                    (None, Some(file)) => {
                        let path = base_dir.join(file);
                        std::fs::read(&path).map_err(|source| ConfigError::KeyFileRead {
                            id: id.to_string(),
                            path,
                            source,
                        })?
                    }
                    (Some(_), Some(_)) => {
                        return Err(ConfigError::InvalidCredential {
                            id: id.to_string(),
                            message: "set only one of private_key or private_key_file".to_string(),
                        });
                    }
                    (None, None) => {
                        return Err(ConfigError::InvalidCredential {
                            id: id.to_string(),
                            message: "private_key or private_key_file is required".to_string(),
                        });
                    }
                };
                let passphrase = passphrase.as_ref().map(|p| p.expose_secret().to_string());
                Ok(Credential::private_key(username.as_str(), key, passphrase))
            }
        }
    }
}

/// Contents of a credentials file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsFile {
    /// Credentials keyed by `<server>` id.
    #[serde(default)]
    pub servers: BTreeMap<String, CredentialSpec>,
    /// Credentials keyed by `<proxy>` id.
    #[serde(default)]
    pub proxies: BTreeMap<String, CredentialSpec>,
}

/// Credential mappings ready to hand to the injectors.
#[derive(Debug, Default)]
pub struct ResolvedCredentials {
    pub servers: CredentialMapping,
    pub proxies: CredentialMapping,
}

impl CredentialsFile {
    /// Read and parse a credentials file.
    ///
    /// # Errors
    /// Returns `ConfigError::CredentialsRead` or `ConfigError::CredentialsParse`.
    /// Parse errors carry only a line and column, never file content.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::CredentialsRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&content).map_err(|e| ConfigError::CredentialsParse {
            path: path.to_path_buf(),
            line: e.line(),
            column: e.column(),
        })
    }

    /// Parse credentials JSON.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Resolve every entry. Ids are trimmed; blank ids are rejected.
    pub fn resolve(&self, base_dir: &Path) -> Result<ResolvedCredentials, ConfigError> {
        Ok(ResolvedCredentials {
            servers: resolve_all(&self.servers, base_dir)?,
            proxies: resolve_all(&self.proxies, base_dir)?,
        })
    }

    /// Load `path` and resolve it against its own directory.
    pub fn load_resolved(path: &Path) -> Result<ResolvedCredentials, ConfigError> {
        let file = Self::load(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let resolved = file.resolve(base_dir)?;
        tracing::debug!(
            path = %path.display(),
            servers = resolved.servers.len(),
            proxies = resolved.proxies.len(),
            "Loaded credentials file"
        );
        Ok(resolved)
    }
}

fn resolve_all(
    entries: &BTreeMap<String, CredentialSpec>,
    base_dir: &Path,
) -> Result<CredentialMapping, ConfigError> {
    let mut mapping = CredentialMapping::new();
    for (id, spec) in entries {
        let id = id.trim();
        if id.is_empty() {
            return Err(ConfigError::InvalidCredential {
                id: id.to_string(),
                message: "id must not be blank".to_string(),
            });
        }
        mapping.insert(id.to_string(), spec.resolve(id, base_dir)?);
    }
    Ok(mapping)
}
