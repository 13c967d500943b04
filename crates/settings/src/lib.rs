//! Credential injection for Maven `settings.xml` documents.
//!
//! This crate rewrites a settings template so that `<server>` and `<proxy>`
//! entries carry authentication material supplied by the caller, while every
//! part of the document that is not intentionally modified survives
//! byte-for-byte.
//!
//! Responsibilities:
//! - Parse and serialize settings documents (see `xml`).
//! - Merge server credentials in replace-all or merge-only mode (see `inject`).
//! - Update proxy credentials in place (see `inject`).
//! - Write private keys to uniquely named files in a scratch directory (see `materialize`).
//!
//! Does NOT handle:
//! - Resolving credentials from a store (callers pass a resolved mapping).
//! - Deleting materialized key files after a successful call (callers own them).
//! - User-facing logging; only `debug` level diagnostics are emitted.

pub mod constants;
pub mod credentials;
pub mod error;
pub mod inject;
pub mod materialize;
pub mod xml;

pub use credentials::{Credential, CredentialKind, CredentialMapping};
pub use error::{Result, SettingsError};
pub use inject::{ProxyFill, SkippedEntry, fill_authentication, fill_proxy_authentication};
pub use materialize::{MaterializedFiles, materialize};
pub use xml::{Element, Node, SettingsDocument, is_xml_text};
