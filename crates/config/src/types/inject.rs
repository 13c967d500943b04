//! Resolved runtime configuration for an injection run.

use std::path::PathBuf;

/// Settings that control how credentials are injected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectConfig {
    /// Directory where private keys are materialized.
    pub scratch_dir: PathBuf,
    /// Replace-all (`true`) or merge-only (`false`) server injection.
    pub replace_all: bool,
    /// Credentials file to read, if any.
    pub credentials_path: Option<PathBuf>,
}
