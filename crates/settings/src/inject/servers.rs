//! Server-auth injection.
//!
//! Replace-all mode leaves exactly one `<server>` per mapped id and drops
//! every other server. Merge-only mode rewrites matched servers and never adds
//! or removes one. In both modes a matched server keeps every child the
//! injector does not own (`filePermissions`, `directoryPermissions`,
//! `configuration`, unknown extensions, comments).

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;

use super::{entry_id, xml_value};
use crate::constants::{
    ID, PASSPHRASE, PASSWORD, PRIVATE_KEY, SERVER, SERVER_OWNED_FIELDS, SERVERS, USERNAME,
};
use crate::credentials::{Credential, CredentialMapping};
use crate::error::Result;
use crate::materialize::MaterializedFiles;
use crate::xml::{Element, SettingsDocument};

/// Inject server credentials into a settings document.
///
/// Private keys are written to files under `scratch_dir`; on success their
/// paths are appended to `temp_files` and the caller owns them.
///
/// # Errors
/// - [`crate::SettingsError::MalformedDocument`] if `settings` is not a well-formed
///   document with a `<settings>` root.
/// - [`crate::SettingsError::InvalidCharacter`] if an id or credential value
///   contains a character XML cannot carry.
/// - [`crate::SettingsError::MaterializationFailure`] if a key file cannot be
///   written. Key files written earlier in the same call are removed first and
///   `temp_files` is left untouched.
pub fn fill_authentication(
    settings: &str,
    replace_all: bool,
    credentials: &CredentialMapping,
    scratch_dir: &Path,
    temp_files: &mut Vec<PathBuf>,
) -> Result<String> {
    if credentials.is_empty() {
        return Ok(settings.to_string());
    }

    let mut document = SettingsDocument::parse(settings)?;
    let root = document.settings_mut()?;
    let mut materialized = MaterializedFiles::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();

    if let Some(servers) = root.child_mut(SERVERS) {
        if replace_all {
            // Drop unmapped servers and later duplicates of mapped ids.
            let mut kept: BTreeSet<&str> = BTreeSet::new();
            let removed = servers.retain_elements(|entry| {
                if entry.name() != SERVER {
                    return true;
                }
                entry_id(entry)
                    .and_then(|id| credentials.get_key_value(id.as_str()))
                    .is_some_and(|(id, _)| kept.insert(id.as_str()))
            });
            tracing::debug!(removed, "Dropped server entries not managed by the mapping");
        }

        for entry in servers.elements_mut().filter(|e| e.name() == SERVER) {
            let Some((id, credential)) =
                entry_id(entry).and_then(|id| credentials.get_key_value(id.as_str()))
            else {
                continue;
            };
            write_credential(entry, id, credential, scratch_dir, &mut materialized)?;
            seen.insert(id.as_str());
        }
    }

    if replace_all {
        let missing: Vec<(&String, &Credential)> = credentials
            .iter()
            .filter(|(id, _)| !seen.contains(id.as_str()))
            .collect();

        if !missing.is_empty() {
            let servers = root.child_or_append(SERVERS);
            for (id, credential) in missing {
                let mut entry = Element::new(SERVER);
                if let Some(indent) = servers.child_indent() {
                    entry.push_whitespace(&indent);
                }
                entry.append_child(Element::with_text(ID, xml_value(id, ID, id)?));
                write_credential(&mut entry, id, credential, scratch_dir, &mut materialized)?;
                servers.append_child(entry);
            }
        }
    }

    let output = document.serialize();
    temp_files.extend(materialized.into_paths());
    Ok(output)
}

/// Replace the owned fields of `entry` with the ones derived from `credential`.
fn write_credential(
    entry: &mut Element,
    id: &str,
    credential: &Credential,
    scratch_dir: &Path,
    materialized: &mut MaterializedFiles,
) -> Result<()> {
    let fields = credential_fields(id, credential, scratch_dir, materialized)?;
    entry.retain_elements(|child| !SERVER_OWNED_FIELDS.contains(&child.name()));
    entry.insert_after(ID, fields);
    tracing::debug!(id, kind = %credential.kind(), "Injected server credential");
    Ok(())
}

fn credential_fields(
    id: &str,
    credential: &Credential,
    scratch_dir: &Path,
    materialized: &mut MaterializedFiles,
) -> Result<Vec<Element>> {
    match credential {
        Credential::UsernamePassword { username, password } => Ok(vec![
            Element::with_text(USERNAME, xml_value(id, USERNAME, username)?),
            Element::with_text(PASSWORD, xml_value(id, PASSWORD, password.expose_secret())?),
        ]),
        Credential::UsernamePrivateKey {
            username,
            private_key,
            passphrase,
        } => {
            let username = xml_value(id, USERNAME, username)?;
            let passphrase = passphrase
                .as_ref()
                .map(|p| xml_value(id, PASSPHRASE, p.expose_secret()))
                .transpose()?;

            let key_path = materialized.materialize(scratch_dir, private_key.expose_secret(), id)?;
            let key_path = key_path.to_string_lossy();
            let mut fields = vec![
                Element::with_text(USERNAME, username),
                Element::with_text(PRIVATE_KEY, xml_value(id, PRIVATE_KEY, &key_path)?),
            ];
            if let Some(passphrase) = passphrase {
                fields.push(Element::with_text(PASSPHRASE, passphrase));
            }
            Ok(fields)
        }
    }
}
