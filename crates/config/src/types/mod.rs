//! Configuration types for mvn-settings.
//!
//! Responsibilities:
//! - Define the resolved runtime configuration (`InjectConfig`).
//! - Define the credentials file format and its resolution into injector input.
//!
//! Does NOT handle:
//! - Loading configuration from the environment (see `loader`).

mod credentials;
mod inject;

pub use credentials::{CredentialSpec, CredentialsFile, ResolvedCredentials};
pub use inject::InjectConfig;
