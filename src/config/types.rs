use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::DEFAULT_ENV_PREFIX;

// ============================================================================
// Backend Configuration
// ============================================================================

/// Which secret backend resolves handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Handle `h` is read from the environment variable `{prefix}{h}`.
    Env {
        #[serde(default = "default_env_prefix")]
        prefix: String,
    },
    /// Handles are looked up in a YAML/JSON file of `handle: value` pairs.
    File { path: PathBuf },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Env {
            prefix: default_env_prefix(),
        }
    }
}

fn default_env_prefix() -> String {
    DEFAULT_ENV_PREFIX.to_string()
}
