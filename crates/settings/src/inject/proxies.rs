//! Proxy-auth injection.
//!
//! Proxies are defined by whoever owns the build infrastructure, so this
//! injector only ever rewrites `<username>`/`<password>` of proxies that
//! already exist. No proxy is added or removed.
//!
//! A private-key credential mapped to a proxy id cannot be expressed in the
//! settings schema. Such entries are skipped, left untouched, and reported
//! in [`ProxyFill::skipped`]; the call itself still succeeds.

use secrecy::ExposeSecret;

use super::{entry_id, xml_value};
use crate::constants::{PASSWORD, PROXIES, PROXY, USERNAME};
use crate::credentials::{Credential, CredentialMapping};
use crate::error::{Result, SettingsError};
use crate::xml::SettingsDocument;

/// Output of [`fill_proxy_authentication`].
#[derive(Debug)]
pub struct ProxyFill {
    /// The updated settings document.
    pub settings: String,
    /// Proxy entries whose credential could not be applied.
    pub skipped: Vec<SkippedEntry>,
}

impl ProxyFill {
    fn unchanged(settings: &str, skipped: Vec<SkippedEntry>) -> Self {
        Self {
            settings: settings.to_string(),
            skipped,
        }
    }
}

/// A proxy entry left untouched, with the reason.
#[derive(Debug)]
pub struct SkippedEntry {
    pub id: String,
    pub reason: SettingsError,
}

/// Inject proxy credentials into a settings document.
///
/// # Errors
/// Returns [`SettingsError::MalformedDocument`] if `settings` is not a
/// well-formed document with a `<settings>` root, and
/// [`SettingsError::InvalidCharacter`] if a mapped username or password
/// contains a character XML cannot carry. Unsupported credential kinds are
/// reported through [`ProxyFill::skipped`], not as errors.
pub fn fill_proxy_authentication(
    settings: &str,
    credentials: &CredentialMapping,
) -> Result<ProxyFill> {
    if credentials.is_empty() {
        return Ok(ProxyFill::unchanged(settings, Vec::new()));
    }

    let mut document = SettingsDocument::parse(settings)?;
    let root = document.settings_mut()?;
    let Some(proxies) = root.child_mut(PROXIES) else {
        return Ok(ProxyFill::unchanged(settings, Vec::new()));
    };

    let mut skipped = Vec::new();
    let mut updated = 0usize;

    for proxy in proxies.elements_mut().filter(|e| e.name() == PROXY) {
        let Some(id) = entry_id(proxy) else {
            continue;
        };
        match credentials.get(&id) {
            None => {}
            Some(Credential::UsernamePassword { username, password }) => {
                let username = xml_value(&id, USERNAME, username)?;
                let password = xml_value(&id, PASSWORD, password.expose_secret())?;
                proxy.set_child_text(USERNAME, username);
                proxy.set_child_text(PASSWORD, password);
                updated += 1;
                tracing::debug!(id = %id, "Injected proxy credential");
            }
            Some(other) => {
                tracing::debug!(id = %id, kind = %other.kind(), "Skipping proxy credential");
                skipped.push(SkippedEntry {
                    reason: SettingsError::UnsupportedCredentialKind {
                        id: id.clone(),
                        kind: other.kind(),
                        element: PROXY,
                    },
                    id,
                });
            }
        }
    }

    if updated == 0 {
        return Ok(ProxyFill::unchanged(settings, skipped));
    }

    Ok(ProxyFill {
        settings: document.serialize(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROXIES_DOC: &str = "<settings>\n  <proxies>\n    <proxy>\n      <id>p1</id>\n      <host>h1</host>\n      <username></username>\n      <password/>\n    </proxy>\n    <proxy>\n      <id>p2</id>\n      <host>h2</host>\n    </proxy>\n  </proxies>\n</settings>";

    fn mapping(entries: Vec<(&str, Credential)>) -> CredentialMapping {
        entries
            .into_iter()
            .map(|(id, credential)| (id.to_string(), credential))
            .collect()
    }

    #[test]
    fn test_empty_mapping_returns_input() {
        let fill = fill_proxy_authentication("garbage", &CredentialMapping::new()).unwrap();
        assert_eq!(fill.settings, "garbage");
        assert!(fill.skipped.is_empty());
    }

    #[test]
    fn test_no_proxies_container_returns_input() {
        let text = "<settings><servers/></settings>";
        let credentials = mapping(vec![("p1", Credential::password("u", "p"))]);

        let fill = fill_proxy_authentication(text, &credentials).unwrap();

        assert_eq!(fill.settings, text);
    }

    #[test]
    fn test_existing_fields_are_overwritten_in_place() {
        let credentials = mapping(vec![("p1", Credential::password("peter", "pwd"))]);

        let fill = fill_proxy_authentication(PROXIES_DOC, &credentials).unwrap();

        assert_eq!(
            fill.settings,
            "<settings>\n  <proxies>\n    <proxy>\n      <id>p1</id>\n      <host>h1</host>\n      <username>peter</username>\n      <password>pwd</password>\n    </proxy>\n    <proxy>\n      <id>p2</id>\n      <host>h2</host>\n    </proxy>\n  </proxies>\n</settings>"
        );
    }

    #[test]
    fn test_missing_fields_are_appended() {
        let credentials = mapping(vec![("p2", Credential::password("dan", "pwd2"))]);

        let fill = fill_proxy_authentication(PROXIES_DOC, &credentials).unwrap();

        let document = SettingsDocument::parse(&fill.settings).unwrap();
        let proxies = document.query("/settings/proxies/proxy");
        assert_eq!(proxies.len(), 2);
        assert_eq!(proxies[1].child_text(USERNAME).as_deref(), Some("dan"));
        assert_eq!(proxies[1].child_text(PASSWORD).as_deref(), Some("pwd2"));
        assert_eq!(proxies[1].child_text("host").as_deref(), Some("h2"));
        assert!(fill.settings.contains("      <host>h2</host>\n      <username>dan</username>"));
    }

    #[test]
    fn test_unknown_ids_never_add_proxies() {
        let credentials = mapping(vec![("p9", Credential::password("u", "p"))]);

        let fill = fill_proxy_authentication(PROXIES_DOC, &credentials).unwrap();

        assert_eq!(fill.settings, PROXIES_DOC);
    }

    #[test]
    fn test_private_key_credential_is_skipped_and_reported() {
        let credentials = mapping(vec![
            ("p1", Credential::private_key("u", b"key".to_vec(), None)),
            ("p2", Credential::password("dan", "pwd2")),
        ]);

        let fill = fill_proxy_authentication(PROXIES_DOC, &credentials).unwrap();

        assert_eq!(fill.skipped.len(), 1);
        assert_eq!(fill.skipped[0].id, "p1");
        assert!(matches!(
            fill.skipped[0].reason,
            SettingsError::UnsupportedCredentialKind { element: "proxy", .. }
        ));
        let document = SettingsDocument::parse(&fill.settings).unwrap();
        let proxies = document.query("/settings/proxies/proxy");
        assert_eq!(proxies[0].child_text(USERNAME).as_deref(), Some(""));
        assert_eq!(proxies[1].child_text(USERNAME).as_deref(), Some("dan"));
    }

    #[test]
    fn test_control_character_in_password_is_rejected() {
        let credentials = mapping(vec![("p1", Credential::password("u", "a\u{1}b"))]);

        let err = fill_proxy_authentication(PROXIES_DOC, &credentials).unwrap_err();

        assert!(matches!(
            err,
            SettingsError::InvalidCharacter { ref id, field: "password" } if id == "p1"
        ));
        assert!(!err.to_string().contains('\u{1}'));
    }

    #[test]
    fn test_carriage_return_in_password_survives_reparse() {
        let credentials = mapping(vec![("p1", Credential::password("u", "a\rb"))]);

        let fill = fill_proxy_authentication(PROXIES_DOC, &credentials).unwrap();

        let document = SettingsDocument::parse(&fill.settings).unwrap();
        let proxy = document.query("/settings/proxies/proxy")[0];
        assert_eq!(proxy.child(PASSWORD).map(|p| p.text()).as_deref(), Some("a\rb"));
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let credentials = mapping(vec![("p1", Credential::password("u", "p"))]);

        let err = fill_proxy_authentication("<settings><proxies></settings>", &credentials)
            .unwrap_err();

        assert!(matches!(err, SettingsError::MalformedDocument { .. }));
    }
}
