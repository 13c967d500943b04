//! Configuration management for mvn-settings.
//!
//! This crate provides the loader for runtime settings (scratch directory,
//! server injection mode, credentials file) and the credentials file format
//! that feeds the injectors.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_scratch_dir, env_var_or_none};
pub use types::{CredentialSpec, CredentialsFile, InjectConfig, ResolvedCredentials};
