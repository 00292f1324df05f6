//! Secret backends: the external collaborators that turn handles into
//! plaintext values.
//!
//! A backend receives one batch of distinct handles per resolution call and
//! returns the pairs it could resolve. Handles it does not know are simply
//! absent from the result; only transport or configuration failures are
//! errors.

use super::document::DocumentFormat;
use super::error::BackendError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Batch-fetch interface for secret values.
#[async_trait]
pub trait SecretBackend: Send + Sync {
    /// Display name for logging.
    fn name(&self) -> &str;

    /// Resolve a batch of handles. Never called with an empty batch.
    async fn fetch_secrets(
        &self,
        handles: &[String],
    ) -> Result<HashMap<String, String>, BackendError>;
}

// ============================================================================
// Environment
// ============================================================================

/// Resolves handle `h` from the environment variable `{prefix}{h}`.
#[derive(Debug, Clone, Default)]
pub struct EnvBackend {
    prefix: String,
}

impl EnvBackend {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn var_name(&self, handle: &str) -> String {
        format!("{}{}", self.prefix, handle)
    }
}

#[async_trait]
impl SecretBackend for EnvBackend {
    fn name(&self) -> &str {
        "env"
    }

    async fn fetch_secrets(
        &self,
        handles: &[String],
    ) -> Result<HashMap<String, String>, BackendError> {
        let mut resolved = HashMap::with_capacity(handles.len());
        for handle in handles {
            match std::env::var(self.var_name(handle)) {
                Ok(value) if !value.is_empty() => {
                    resolved.insert(handle.clone(), value);
                }
                Ok(_) => debug!("Environment variable for handle '{handle}' is set but empty"),
                Err(_) => debug!("Environment variable for handle '{handle}' is not set"),
            }
        }
        Ok(resolved)
    }
}

// ============================================================================
// File
// ============================================================================

/// Resolves handles from a YAML or JSON file mapping handle → value.
///
/// The file is re-read on every fetch so edits take effect without restart.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<HashMap<String, String>, BackendError> {
        let content = tokio::fs::read(&self.path).await.map_err(|e| {
            BackendError::new(
                self.name(),
                format!("cannot read '{}': {e}", self.path.display()),
            )
        })?;

        let parsed = match DocumentFormat::from_path(&self.path) {
            DocumentFormat::Yaml => serde_yaml::from_slice(&content).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::from_slice(&content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|e| {
            BackendError::new(
                self.name(),
                format!("'{}' is not a handle-to-value mapping: {e}", self.path.display()),
            )
        })
    }
}

#[async_trait]
impl SecretBackend for FileBackend {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_secrets(
        &self,
        handles: &[String],
    ) -> Result<HashMap<String, String>, BackendError> {
        let mut secrets = self.load().await?;
        Ok(handles
            .iter()
            .filter_map(|h| secrets.remove_entry(h))
            .collect())
    }
}

// ============================================================================
// Static
// ============================================================================

/// Fixed in-memory secrets, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticBackend {
    secrets: HashMap<String, String>,
}

impl StaticBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_secret(mut self, handle: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(handle.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticBackend {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            secrets: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl SecretBackend for StaticBackend {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_secrets(
        &self,
        handles: &[String],
    ) -> Result<HashMap<String, String>, BackendError> {
        Ok(handles
            .iter()
            .filter_map(|h| self.secrets.get(h).map(|v| (h.clone(), v.clone())))
            .collect())
    }
}
