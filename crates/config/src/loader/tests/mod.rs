//! Tests for the configuration loader builder.
//!
//! Responsibilities:
//! - Test builder methods and defaults.
//! - Test environment variable handling and precedence.
//! - Test `.env` loading and the `DOTENV_DISABLED` gate.
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` for additional synchronization.

use std::sync::Mutex;


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Environment variables read by the loader, all cleared.
pub fn cleared_env() -> [(&'static str, Option<&'static str>); 3] {
    use crate::constants::{ENV_CREDENTIALS, ENV_REPLACE_ALL, ENV_SCRATCH_DIR};
    [
        (ENV_SCRATCH_DIR, None),
        (ENV_REPLACE_ALL, None),
        (ENV_CREDENTIALS, None),
    ]
}
