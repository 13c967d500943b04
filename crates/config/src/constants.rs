//! Centralized constants for the mvn-settings workspace.
//!
//! Environment variable names and defaults shared by the config loader and
//! the CLI live here to avoid duplicating string literals across crates.

// =============================================================================
// Environment Variables
// =============================================================================

/// Directory where private keys are materialized.
pub const ENV_SCRATCH_DIR: &str = "MVN_SETTINGS_SCRATCH_DIR";

/// Whether server injection runs in replace-all mode (`true`/`false`).
pub const ENV_REPLACE_ALL: &str = "MVN_SETTINGS_REPLACE_ALL";

/// Path to the credentials JSON file.
pub const ENV_CREDENTIALS: &str = "MVN_SETTINGS_CREDENTIALS";

/// Set to `1` or `true` to skip `.env` loading.
pub const ENV_DOTENV_DISABLED: &str = "DOTENV_DISABLED";

// =============================================================================
// Defaults
// =============================================================================

/// Application name used to resolve platform directories.
pub const APP_NAME: &str = "mvn-settings";

/// Subdirectory of the platform cache dir used as the default scratch dir.
pub const SCRATCH_SUBDIR: &str = "scratch";

/// Server injection merges by default; replace-all must be asked for.
pub const DEFAULT_REPLACE_ALL: bool = false;
