//! Shared cache of resolved secrets.

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// Handle → plaintext cache shared by every resolver holding a clone.
///
/// Entries live until the cache is dropped: there is no expiry, eviction or
/// invalidation. Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct SecretCache {
    entries: Arc<DashMap<String, String>>,
}

impl SecretCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached plaintext for `handle`.
    pub fn get(&self, handle: &str) -> Option<String> {
        self.entries.get(handle).map(|entry| entry.value().clone())
    }

    /// Store the plaintext for `handle`, replacing any previous value.
    pub fn set(&self, handle: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(handle.into(), value.into());
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.entries.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for SecretCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}
