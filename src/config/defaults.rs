/// Default configuration constants used across the system.

/// Default maximum container nesting of a resolved document.
pub const DEFAULT_MAX_DEPTH: usize = crate::secrets::DEFAULT_MAX_DEPTH;

/// Default maximum size of an input document (10 MB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Default prefix prepended to a handle to form an environment variable name.
pub const DEFAULT_ENV_PREFIX: &str = "ENCSECRET_";

/// Directory under the home directory holding the user config.
pub const HOME_CONFIG_DIR: &str = ".encsecret";
