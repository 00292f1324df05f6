use super::{BackendConfig, Config};
use anyhow::Result;
use tracing::warn;

/// Validation errors for configuration.
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a configuration object.
pub fn validate_config(config: &Config) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    if config.max_depth == 0 {
        errors.push(ConfigValidationError {
            path: "maxDepth".to_string(),
            message: "Maximum depth must be greater than 0".to_string(),
        });
    }

    if config.max_document_bytes == 0 {
        errors.push(ConfigValidationError {
            path: "maxDocumentBytes".to_string(),
            message: "Maximum document size must be greater than 0".to_string(),
        });
    }

    match &config.backend {
        BackendConfig::File { path } => {
            if path.as_os_str().is_empty() {
                errors.push(ConfigValidationError {
                    path: "backend.path".to_string(),
                    message: "File backend requires a secrets file path".to_string(),
                });
            } else if !path.exists() {
                warn!("Secrets file '{}' does not exist yet", path.display());
            }
        }
        BackendConfig::Env { prefix } => {
            if prefix.is_empty() {
                warn!("Env backend has an empty prefix; handles map to bare variable names");
            }
        }
    }

    errors
}

/// Validate configuration and return Result.
pub fn validate_config_object(config: &Config) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("Configuration validation failed:\n{}", messages.join("\n"));
    }
}
