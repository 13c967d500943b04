//! End-to-end injection tests against a full Maven settings template.
//!
//! These tests exercise both injectors through the public API and check the
//! output with path queries, the way a consumer of the generated
//! `settings.xml` would read it.

use std::path::PathBuf;

use mvn_settings::{
    Credential, CredentialMapping, SettingsDocument, fill_authentication,
    fill_proxy_authentication,
};
use tempfile::TempDir;

const SETTINGS: &str = include_str!("fixtures/settings_test.xml");
const PWD: &str = "MY_NEW_PWD";
const PWD_2: &str = "{COQLCE6DU6GtcS5P=}";
const SERVER_COUNT: usize = 5;

fn server_mapping() -> CredentialMapping {
    let mut credentials = CredentialMapping::new();
    credentials.insert("my.server".to_string(), Credential::password("peter", PWD));
    credentials.insert("encoded_pwd".to_string(), Credential::password("dan", PWD_2));
    credentials
}

fn fill(replace_all: bool, credentials: &CredentialMapping) -> (String, Vec<PathBuf>, TempDir) {
    let scratch = TempDir::new().unwrap();
    let mut temp_files = Vec::new();
    let output = fill_authentication(
        SETTINGS,
        replace_all,
        credentials,
        scratch.path(),
        &mut temp_files,
    )
    .expect("injection should succeed");
    (output, temp_files, scratch)
}

fn server<'a>(document: &'a SettingsDocument, id: &str) -> &'a mvn_settings::Element {
    document
        .query("/settings/servers/server")
        .into_iter()
        .find(|s| s.child_text("id").as_deref() == Some(id))
        .unwrap_or_else(|| panic!("server '{id}' not found"))
}

fn proxy<'a>(document: &'a SettingsDocument, id: &str) -> &'a mvn_settings::Element {
    document
        .query("/settings/proxies/proxy")
        .into_iter()
        .find(|p| p.child_text("id").as_deref() == Some(id))
        .unwrap_or_else(|| panic!("proxy '{id}' not found"))
}

#[test]
fn test_fixture_has_expected_shape() {
    let document = SettingsDocument::parse(SETTINGS).unwrap();
    assert_eq!(document.query("/settings/servers/server").len(), SERVER_COUNT);
    assert_eq!(document.query("/settings/proxies/proxy").len(), 3);
}

#[test]
fn test_server_auth_is_replaced_when_replace_all() {
    let (output, temp_files, _scratch) = fill(true, &server_mapping());

    assert!(output.contains(PWD), "replaced settings.xml must contain new password");
    assert!(temp_files.is_empty());

    let document = SettingsDocument::parse(&output).expect("output must stay well-formed");
    assert_eq!(
        document.query("/settings/servers/server").len(),
        2,
        "only the servers managed by the mapping remain"
    );

    let my_server = server(&document, "my.server");
    assert_eq!(my_server.child_text("password").as_deref(), Some(PWD));
    assert_eq!(my_server.child_text("username").as_deref(), Some("peter"));

    let encoded = server(&document, "encoded_pwd");
    assert_eq!(encoded.child_text("password").as_deref(), Some(PWD_2));
    assert_eq!(encoded.child_text("username").as_deref(), Some("dan"));
}

#[test]
fn test_server_auth_is_replaced_when_merge_only() {
    let (output, _, _scratch) = fill(false, &server_mapping());

    assert!(output.contains(PWD));

    let document = SettingsDocument::parse(&output).unwrap();
    assert_eq!(
        document.query("/settings/servers/server").len(),
        SERVER_COUNT,
        "merge-only must keep every server"
    );

    let my_server = server(&document, "my.server");
    assert_eq!(my_server.child_text("password").as_deref(), Some(PWD));
    assert_eq!(my_server.child_text("username").as_deref(), Some("peter"));

    let encoded = server(&document, "encoded_pwd");
    assert_eq!(encoded.child_text("password").as_deref(), Some(PWD_2));
    assert_eq!(encoded.child_text("username").as_deref(), Some("dan"));

    let untouched = server(&document, "untouched");
    assert_eq!(untouched.child_text("password").as_deref(), Some("keep-me"));
}

#[test]
fn test_replace_all_with_only_new_ids_drops_every_existing_server() {
    let mut credentials = CredentialMapping::new();
    credentials.insert("brand-new-1".to_string(), Credential::password("a", "1"));
    credentials.insert("brand-new-2".to_string(), Credential::password("b", "2"));

    let (output, _, _scratch) = fill(true, &credentials);

    let document = SettingsDocument::parse(&output).unwrap();
    let ids: Vec<String> = document
        .query("/settings/servers/server")
        .into_iter()
        .filter_map(|s| s.child_text("id"))
        .collect();
    assert_eq!(ids, ["brand-new-1", "brand-new-2"]);
}

#[test]
fn test_merge_only_ignores_ids_absent_from_document() {
    let mut credentials = CredentialMapping::new();
    credentials.insert("brand-new".to_string(), Credential::password("a", "1"));

    let (output, _, _scratch) = fill(false, &credentials);

    assert_eq!(output, SETTINGS, "nothing matched, so nothing may change");
}

#[test]
fn test_settings_unchanged_without_credentials() {
    for replace_all in [true, false] {
        let (output, temp_files, _scratch) = fill(replace_all, &CredentialMapping::new());
        assert_eq!(output, SETTINGS, "no changes should have been made to the settings");
        assert!(temp_files.is_empty());
    }
}

fn assert_pass_through_fields_kept(replace_all: bool) {
    let server_id = "jenkins-39991";
    let mut credentials = CredentialMapping::new();
    credentials.insert(server_id.to_string(), Credential::password("peter", PWD));

    let original = SettingsDocument::parse(SETTINGS).unwrap();
    let before = server(&original, server_id);

    let (output, _, _scratch) = fill(replace_all, &credentials);
    let document = SettingsDocument::parse(&output).unwrap();
    let after = server(&document, server_id);

    assert_eq!(after.child_text("password").as_deref(), Some(PWD));
    assert_eq!(after.child_text("username").as_deref(), Some("peter"));
    for field in ["filePermissions", "directoryPermissions", "configuration"] {
        assert_eq!(
            after.child_text(field),
            before.child_text(field),
            "{field} is not set correct"
        );
    }
    assert_eq!(
        after.child("configuration").map(ToString::to_string),
        before.child("configuration").map(ToString::to_string),
        "configuration must survive byte-for-byte"
    );
}

#[test]
fn test_server_elements_kept_when_matching_credentials_merge_only() {
    assert_pass_through_fields_kept(false);
}

#[test]
fn test_server_elements_kept_when_matching_credentials_replace_all() {
    assert_pass_through_fields_kept(true);
}

#[test]
fn test_unrelated_sections_survive_verbatim() {
    let (output, _, _scratch) = fill(true, &server_mapping());

    let servers_start = SETTINGS.find("  <servers>").unwrap();
    let servers_end = SETTINGS.find("</servers>").unwrap() + "</servers>".len();
    let prefix = &SETTINGS[..servers_start];
    let suffix = &SETTINGS[servers_end..];

    assert!(output.starts_with(prefix), "everything before <servers> is untouched");
    assert!(output.ends_with(suffix), "everything after </servers> is untouched");
    assert!(output.contains("<![CDATA[https://repo.example.com/releases?a=1&b=2]]>"));
}

#[test]
fn test_private_key_servers_reference_materialized_files() {
    let mut credentials = CredentialMapping::new();
    credentials.insert(
        "siteServer".to_string(),
        Credential::private_key("deployer", b"-----BEGIN KEY-----\n".to_vec(), Some("pp".into())),
    );
    credentials.insert(
        "new-key-server".to_string(),
        Credential::private_key("ci", b"OTHER".to_vec(), None),
    );

    let (output, temp_files, scratch) = fill(true, &credentials);

    assert_eq!(temp_files.len(), 2);
    let scratch_root = std::fs::canonicalize(scratch.path()).unwrap();
    for path in &temp_files {
        assert!(path.starts_with(&scratch_root));
        assert!(path.exists(), "caller owns the files, they must still exist");
    }

    let document = SettingsDocument::parse(&output).unwrap();
    let site = server(&document, "siteServer");
    let key_path = PathBuf::from(site.child_text("privateKey").unwrap());
    assert!(temp_files.contains(&key_path));
    assert_eq!(std::fs::read(&key_path).unwrap(), b"-----BEGIN KEY-----\n");
    assert_eq!(site.child_text("passphrase").as_deref(), Some("pp"));

    let fresh = server(&document, "new-key-server");
    assert!(fresh.child("passphrase").is_none());
    assert_eq!(fresh.child_text("username").as_deref(), Some("ci"));
}

#[test]
fn test_proxy_auth_is_replaced() {
    let mut credentials = CredentialMapping::new();
    credentials.insert("proxy1".to_string(), Credential::password("peter", PWD));
    credentials.insert("proxy2".to_string(), Credential::password("dan", PWD_2));

    let fill = fill_proxy_authentication(SETTINGS, &credentials).unwrap();

    assert!(fill.skipped.is_empty());
    let document = SettingsDocument::parse(&fill.settings).unwrap();
    assert_eq!(
        document.query("/settings/proxies/proxy").len(),
        3,
        "proxy count must not change"
    );

    let proxy1 = proxy(&document, "proxy1");
    assert_eq!(proxy1.child_text("password").as_deref(), Some(PWD));
    assert_eq!(proxy1.child_text("username").as_deref(), Some("peter"));
    assert_eq!(
        proxy1.child_text("nonProxyHosts").as_deref(),
        Some("www.google.com|*.example.com")
    );

    let proxy2 = proxy(&document, "proxy2");
    assert_eq!(proxy2.child_text("password").as_deref(), Some(PWD_2));
    assert_eq!(proxy2.child_text("username").as_deref(), Some("dan"));

    let proxy3 = proxy(&document, "proxy3");
    assert_eq!(
        proxy3.child_text("password").as_deref(),
        Some(""),
        "proxy3 should still not have a password"
    );
    assert_eq!(
        proxy3.child_text("username").as_deref(),
        Some(""),
        "proxy3 should still not have a username"
    );
}

#[test]
fn test_server_then_proxy_pipeline() {
    let (servers_done, _, _scratch) = fill(false, &server_mapping());

    let mut proxies = CredentialMapping::new();
    proxies.insert("proxy3".to_string(), Credential::password("late", "pw"));
    let fill = fill_proxy_authentication(&servers_done, &proxies).unwrap();

    let document = SettingsDocument::parse(&fill.settings).unwrap();
    assert_eq!(server(&document, "my.server").child_text("username").as_deref(), Some("peter"));
    assert_eq!(proxy(&document, "proxy3").child_text("username").as_deref(), Some("late"));
    assert_eq!(document.query("/settings/servers/server").len(), SERVER_COUNT);
}
