mod defaults;
mod io;
mod types;
mod validation;

pub use defaults::*;
pub use io::*;
pub use types::*;
pub use validation::*;

use crate::secrets::{
    DocumentFormat, EnvBackend, FileBackend, SecretBackend, SecretCache, SecretResolver,
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Top-level encsecret configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    /// Maximum container nesting accepted in a document.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Maximum size of an input document in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,
}

impl Config {
    /// Load configuration from file, environment, and defaults.
    ///
    /// An explicitly given path must exist; otherwise the standard locations
    /// are searched and defaults are used when none is found.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                let p = PathBuf::from(p);
                if !p.exists() {
                    bail!("Config file '{}' does not exist", p.display());
                }
                Some(p)
            }
            None => find_config_file(),
        };

        let mut config = match config_path {
            Some(p) => {
                info!("Loading config from {}", p.display());
                load_config_file(&p)?
            }
            None => {
                info!("No config file found, using defaults");
                Config::default()
            }
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Build the secret backend described by this configuration.
    pub fn build_backend(&self) -> Arc<dyn SecretBackend> {
        match &self.backend {
            BackendConfig::Env { prefix } => Arc::new(EnvBackend::new(prefix.clone())),
            BackendConfig::File { path } => Arc::new(FileBackend::new(path.clone())),
        }
    }

    /// Build a resolver for documents of `format` sharing `cache`.
    pub fn resolver(&self, cache: SecretCache, format: DocumentFormat) -> SecretResolver {
        SecretResolver::new(self.build_backend(), cache)
            .with_format(format)
            .with_max_depth(self.max_depth)
    }

    /// Apply environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(prefix) = var("ENCSECRET_ENV_PREFIX") {
            self.backend = BackendConfig::Env { prefix };
        }

        if let Some(path) = var("ENCSECRET_SECRETS_FILE") {
            self.backend = BackendConfig::File {
                path: PathBuf::from(path),
            };
        }

        if let Some(depth) = var("ENCSECRET_MAX_DEPTH") {
            if let Ok(depth) = depth.parse() {
                self.max_depth = depth;
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_document_bytes() -> u64 {
    DEFAULT_MAX_DOCUMENT_BYTES
}

/// Find the configuration file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    let candidates = [
        PathBuf::from("encsecret.yaml"),
        PathBuf::from("encsecret.yml"),
        PathBuf::from("encsecret.json"),
    ];

    for path in &candidates {
        if path.exists() {
            return Some(path.clone());
        }
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(HOME_CONFIG_DIR).join("config.yaml");
        if home_config.exists() {
            return Some(home_config);
        }
    }

    None
}

/// Load configuration from a file path.
fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    let config = match DocumentFormat::from_path(path) {
        DocumentFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON config '{}'", path.display()))?,
        DocumentFormat::Yaml => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML config '{}'", path.display()))?,
    };

    Ok(config)
}
