//! Shared test utilities for mvn-settings integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Provide fixture helpers for settings templates and credentials files.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - `MVN_SETTINGS_*` variables from the host never reach the child process.

use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// Settings template shared by the CLI tests.
#[allow(dead_code)]
pub const SETTINGS: &str = include_str!("../fixtures/settings.xml");

/// Returns a hermetic `mvn-settings` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - `MVN_SETTINGS_*` variables are cleared to ensure no leakage from the host.
pub fn mvn_settings_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mvn-settings");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("MVN_SETTINGS_SCRATCH_DIR")
        .env_remove("MVN_SETTINGS_REPLACE_ALL")
        .env_remove("MVN_SETTINGS_CREDENTIALS")
        .env_remove("RUST_LOG");

    cmd
}

/// Write `content` to `dir/name` and return the path.
#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
