//! Two-phase resolution of `ENC[handle]` placeholders.
//!
//! 1. **Collect**: walk the document; cached handles are substituted
//!    immediately, the rest are gathered into one ordered, duplicate-free batch.
//! 2. **Fetch**: a single backend call for the whole batch; every returned
//!    pair is written to the cache.
//! 3. **Substitute**: walk again, replacing placeholders whose handle the
//!    batch resolved. Unresolved placeholders stay verbatim and are logged.

use super::backend::SecretBackend;
use super::cache::SecretCache;
use super::document::{decode, encode, Document, DocumentFormat};
use super::error::ResolveError;
use super::token::detect;
use super::walker::{visit, walk, DEFAULT_MAX_DEPTH};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one resolution call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionReport {
    /// Placeholder occurrences substituted from the cache during collection.
    pub cache_hits: usize,
    /// Distinct handles sent to the backend, in first-seen order.
    pub fetched: Vec<String>,
    /// Placeholder occurrences substituted from the backend response.
    pub resolved: usize,
    /// Fetched handles the backend did not return; left verbatim.
    pub unresolved: Vec<String>,
}

impl ResolutionReport {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// A placeholder found by [`audit`], with the path of the value holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderRef {
    pub handle: String,
    pub path: String,
}

/// Resolves placeholders in documents through a backend and a shared cache.
#[derive(Clone)]
pub struct SecretResolver {
    backend: Arc<dyn SecretBackend>,
    cache: SecretCache,
    format: DocumentFormat,
    max_depth: usize,
}

impl SecretResolver {
    pub fn new(backend: Arc<dyn SecretBackend>, cache: SecretCache) -> Self {
        Self {
            backend,
            cache,
            format: DocumentFormat::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn cache(&self) -> &SecretCache {
        &self.cache
    }

    /// Decode `raw`, resolve every placeholder and re-encode the result.
    pub async fn resolve(&self, raw: &[u8]) -> Result<Vec<u8>, ResolveError> {
        self.resolve_with_report(raw).await.map(|(out, _)| out)
    }

    /// Like [`resolve`](Self::resolve), also returning what happened.
    pub async fn resolve_with_report(
        &self,
        raw: &[u8],
    ) -> Result<(Vec<u8>, ResolutionReport), ResolveError> {
        let mut doc = decode(raw, self.format)?;
        let report = self.resolve_document(&mut doc).await?;
        let out = encode(&doc, self.format)?;
        Ok((out, report))
    }

    /// Resolve placeholders in an already decoded document, in place.
    pub async fn resolve_document(
        &self,
        doc: &mut Document,
    ) -> Result<ResolutionReport, ResolveError> {
        let mut report = ResolutionReport::default();
        let mut pending: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        walk(doc, self.max_depth, |scalar| {
            let Some(handle) = detect(scalar) else {
                return Ok(None);
            };
            if let Some(secret) = self.cache.get(handle) {
                report.cache_hits += 1;
                return Ok(Some(secret));
            }
            if seen.insert(handle.to_string()) {
                pending.push(handle.to_string());
            }
            Ok(None)
        })?;

        if pending.is_empty() {
            debug!(
                "No secrets to fetch ({} placeholder(s) served from cache)",
                report.cache_hits
            );
            return Ok(report);
        }

        info!(
            "Fetching {} secret(s) from backend '{}'",
            pending.len(),
            self.backend.name()
        );
        let secrets = self.backend.fetch_secrets(&pending).await?;

        for (handle, value) in &secrets {
            self.cache.set(handle.as_str(), value.as_str());
        }

        let mut resolved = 0;
        walk(doc, self.max_depth, |scalar| {
            let replacement = detect(scalar).and_then(|h| secrets.get(h)).cloned();
            if replacement.is_some() {
                resolved += 1;
            }
            Ok(replacement)
        })?;
        report.resolved = resolved;

        report.unresolved = pending
            .iter()
            .filter(|h| !secrets.contains_key(h.as_str()))
            .cloned()
            .collect();
        for handle in &report.unresolved {
            warn!(
                "Secret handle '{handle}' was not resolved by backend '{}'; placeholder left as-is",
                self.backend.name()
            );
        }
        report.fetched = pending;

        info!(
            "Secret resolution complete: {} from cache, {} resolved, {} unresolved",
            report.cache_hits,
            report.resolved,
            report.unresolved.len()
        );

        Ok(report)
    }
}

/// List every placeholder in `doc` without resolving anything.
pub fn audit(doc: &Document, max_depth: usize) -> Result<Vec<PlaceholderRef>, ResolveError> {
    let mut refs = Vec::new();
    visit(doc, max_depth, |path, value| {
        if let Some(handle) = detect(value) {
            refs.push(PlaceholderRef {
                handle: handle.to_string(),
                path: path.to_string(),
            });
        }
    })?;
    Ok(refs)
}
