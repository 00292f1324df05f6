//! Error types for secret resolution.

use thiserror::Error;

/// Failure reported by a [`SecretBackend`](super::backend::SecretBackend).
#[derive(Debug, Clone, Error)]
#[error("secret backend '{backend}' failed: {message}")]
pub struct BackendError {
    /// Name of the backend that failed.
    pub backend: String,
    /// Human-readable failure reason. Never contains secret values.
    pub message: String,
}

impl BackendError {
    pub fn new(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            message: message.into(),
        }
    }
}

/// Fatal errors that abort a resolution call.
///
/// A handle the backend could not resolve is deliberately absent here: the
/// placeholder is left verbatim in the output and only logged.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Input bytes are not a well-formed document.
    #[error("could not decode document: {0}")]
    Decode(String),

    /// The document could not be re-serialized after substitution.
    #[error("could not encode document after replacing encrypted secrets: {0}")]
    Encode(String),

    /// The batch fetch failed; nothing is substituted from this call.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The document nests deeper than the walker allows.
    #[error("document nesting exceeds the maximum depth of {limit}")]
    DepthExceeded {
        /// The configured depth limit.
        limit: usize,
    },
}
