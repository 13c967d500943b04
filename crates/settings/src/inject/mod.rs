//! Credential injectors for `<servers>` and `<proxies>`.
//!
//! Responsibilities:
//! - Merge server credentials according to the replace-all policy (see `servers`).
//! - Update proxy credentials in place (see `proxies`).
//!
//! Does NOT handle:
//! - Encrypting or decrypting passwords; values are written exactly as given.
//!
//! Invariants:
//! - An empty credential mapping returns the input text unchanged, without parsing it.
//! - A call either returns the full updated text or an error; never partial output.
//! - Every value written into the document passes [`is_xml_text`], so the output
//!   always parses again.

mod proxies;
mod servers;

pub use proxies::{ProxyFill, SkippedEntry, fill_proxy_authentication};
pub use servers::fill_authentication;

use crate::constants::ID;
use crate::error::{Result, SettingsError};
use crate::xml::{Element, is_xml_text};

/// Trimmed `<id>` of a server or proxy entry.
fn entry_id(entry: &Element) -> Option<String> {
    entry.child_text(ID).filter(|id| !id.is_empty())
}

/// `value`, if it can be written as content of `<field>`.
fn xml_value<'v>(id: &str, field: &'static str, value: &'v str) -> Result<&'v str> {
    if is_xml_text(value) {
        Ok(value)
    } else {
        Err(SettingsError::InvalidCharacter {
            id: id.to_string(),
            field,
        })
    }
}
