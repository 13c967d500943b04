//! Element names from the Maven settings schema that the injectors touch.

/// Root element of a settings document.
pub const SETTINGS: &str = "settings";

/// Container of `<server>` entries.
pub const SERVERS: &str = "servers";

/// A single server authentication entry.
pub const SERVER: &str = "server";

/// Container of `<proxy>` entries.
pub const PROXIES: &str = "proxies";

/// A single proxy definition.
pub const PROXY: &str = "proxy";

pub const ID: &str = "id";
pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
pub const PRIVATE_KEY: &str = "privateKey";
pub const PASSPHRASE: &str = "passphrase";

/// Children of `<server>` that are rewritten from a credential.
///
/// Everything else under a matched server (`filePermissions`,
/// `directoryPermissions`, `configuration`, unknown extensions) is carried
/// over untouched.
pub const SERVER_OWNED_FIELDS: [&str; 4] = [USERNAME, PASSWORD, PRIVATE_KEY, PASSPHRASE];

/// Children of `<proxy>` that are rewritten from a credential.
pub const PROXY_OWNED_FIELDS: [&str; 2] = [USERNAME, PASSWORD];

/// Indentation unit used when a new element has no sibling to copy from.
pub const DEFAULT_INDENT_UNIT: &str = "  ";

/// Suffix of materialized private key files.
pub const KEY_FILE_SUFFIX: &str = ".key";

/// Random characters appended to materialized file names.
pub const KEY_FILE_RANDOM_LEN: usize = 12;
