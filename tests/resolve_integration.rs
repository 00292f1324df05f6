//! End-to-end tests for placeholder resolution through the public API.
//!
//! A recording backend captures every batch it receives so the tests can
//! assert how often, and with which handles, the backend was called.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use encsecret::secrets::{
    decode, BackendError, Document, DocumentFormat, ResolveError, SecretBackend, SecretCache,
    SecretResolver,
};

// ============================================================================
// Recording backend
// ============================================================================

#[derive(Default)]
struct RecordingBackend {
    secrets: HashMap<String, String>,
    fail: bool,
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingBackend {
    fn with(pairs: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            secrets: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Self::default()
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    async fn fetch_secrets(
        &self,
        handles: &[String],
    ) -> Result<HashMap<String, String>, BackendError> {
        self.calls.lock().unwrap().push(handles.to_vec());
        if self.fail {
            return Err(BackendError::new("recording", "backend unavailable"));
        }
        Ok(handles
            .iter()
            .filter_map(|h| self.secrets.get(h).map(|v| (h.clone(), v.clone())))
            .collect())
    }
}

fn resolver_for(backend: &Arc<RecordingBackend>, cache: &SecretCache) -> SecretResolver {
    SecretResolver::new(backend.clone(), cache.clone())
}

fn yaml(src: &str) -> Document {
    decode(src.as_bytes(), DocumentFormat::Yaml).unwrap()
}

fn decoded(out: &[u8]) -> Document {
    decode(out, DocumentFormat::Yaml).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn documented_example() {
    let backend = RecordingBackend::with(&[("db-pass", "secret1")]);
    let resolver = resolver_for(&backend, &SecretCache::new());

    let input = r#"{a: "ENC[db-pass]", b: ["x", "ENC[db-pass]", {c: "ENC[api-key]"}]}"#;
    let out = resolver.resolve(input.as_bytes()).await.unwrap();

    assert_eq!(
        decoded(&out),
        yaml(r#"{a: secret1, b: [x, secret1, {c: "ENC[api-key]"}]}"#)
    );
    assert_eq!(
        backend.calls(),
        vec![vec!["db-pass".to_string(), "api-key".to_string()]]
    );
}

#[tokio::test]
async fn document_without_placeholders_is_unchanged() {
    let backend = RecordingBackend::with(&[]);
    let resolver = resolver_for(&backend, &SecretCache::new());

    let input = "name: agent\nport: 8125\nenabled: true\nhosts:\n- a\n- b\nnested:\n  deeper:\n  - key: value\n";
    let out = resolver.resolve(input.as_bytes()).await.unwrap();

    assert_eq!(decoded(&out), yaml(input));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn resolving_twice_is_a_no_op() {
    let backend = RecordingBackend::with(&[("k", "v")]);
    let resolver = resolver_for(&backend, &SecretCache::new());

    let first = resolver.resolve(b"a: ENC[k]\n").await.unwrap();
    let second = resolver.resolve(&first).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn repeated_handle_is_fetched_once() {
    let backend = RecordingBackend::with(&[("db", "pw")]);
    let cache = SecretCache::new();
    let resolver = resolver_for(&backend, &cache);

    let input = "a: ENC[db]\nb:\n- ENC[db]\n- ENC[db]\nc:\n  d: ENC[db]\n";
    let (out, report) = resolver.resolve_with_report(input.as_bytes()).await.unwrap();

    assert_eq!(decoded(&out), yaml("a: pw\nb:\n- pw\n- pw\nc:\n  d: pw\n"));
    assert_eq!(backend.calls(), vec![vec!["db".to_string()]]);
    assert_eq!(report.resolved, 4);

    // A second top-level call is served entirely from the shared cache.
    let other = resolver_for(&backend, &cache);
    let out = other.resolve(b"x: ENC[db]\n").await.unwrap();
    assert_eq!(decoded(&out), yaml("x: pw\n"));
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn fully_cached_document_skips_backend() {
    let backend = RecordingBackend::failing();
    let cache = SecretCache::new();
    cache.set("a", "1");
    cache.set("b", "2");
    let resolver = resolver_for(&backend, &cache);

    let (out, report) = resolver
        .resolve_with_report(b"x: ENC[a]\ny: [\"ENC[b]\", \"ENC[a]\"]\n")
        .await
        .unwrap();

    assert_eq!(decoded(&out), yaml("x: '1'\ny: ['2', '1']\n"));
    assert_eq!(report.cache_hits, 3);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn unresolved_handles_pass_through() {
    let backend = RecordingBackend::with(&[("h1", "one")]);
    let resolver = resolver_for(&backend, &SecretCache::new());

    let (out, report) = resolver
        .resolve_with_report(b"a: ENC[h1]\nb: ENC[h2]\nc:\n- ENC[h2]\n- ENC[h1]\n")
        .await
        .unwrap();

    assert_eq!(
        decoded(&out),
        yaml("a: one\nb: ENC[h2]\nc:\n- ENC[h2]\n- one\n")
    );
    assert_eq!(report.unresolved, vec!["h2".to_string()]);
    assert!(!report.is_complete());
}

#[tokio::test]
async fn deep_placeholders_are_found_but_keys_are_not() {
    let backend = RecordingBackend::with(&[("deep", "found"), ("key", "never")]);
    let resolver = resolver_for(&backend, &SecretCache::new());

    let input = "- a:\n  - b:\n    - c:\n        d: ENC[deep]\n- ENC[key]: plain\n";
    let out = resolver.resolve(input.as_bytes()).await.unwrap();

    assert_eq!(
        decoded(&out),
        yaml("- a:\n  - b:\n    - c:\n        d: found\n- ENC[key]: plain\n")
    );
    assert_eq!(backend.calls(), vec![vec!["deep".to_string()]]);
}

#[tokio::test]
async fn backend_failure_returns_no_output() {
    let backend = RecordingBackend::failing();
    let resolver = resolver_for(&backend, &SecretCache::new());

    let err = resolver.resolve(b"a: ENC[x]\n").await.unwrap_err();

    assert!(matches!(err, ResolveError::Backend(ref e) if e.message == "backend unavailable"));
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn malformed_input_never_reaches_backend() {
    let backend = RecordingBackend::with(&[]);
    let resolver = resolver_for(&backend, &SecretCache::new());

    let err = resolver.resolve(b"a: [ENC[x]\n").await.unwrap_err();

    assert!(matches!(err, ResolveError::Decode(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn empty_and_bracketed_handles_are_distinct() {
    let backend = RecordingBackend::with(&[("", "empty"), (" ", "space"), ("a]b", "odd")]);
    let resolver = resolver_for(&backend, &SecretCache::new());

    let out = resolver
        .resolve(b"- ENC[]\n- 'ENC[ ]'\n- ENC[a]b]\n")
        .await
        .unwrap();

    assert_eq!(decoded(&out), yaml("- empty\n- space\n- odd\n"));
    assert_eq!(
        backend.calls(),
        vec![vec!["".to_string(), " ".to_string(), "a]b".to_string()]]
    );
}

#[tokio::test]
async fn excessive_nesting_is_fatal() {
    let backend = RecordingBackend::with(&[("x", "y")]);
    let resolver = resolver_for(&backend, &SecretCache::new()).with_max_depth(64);

    let mut doc = Document::String("ENC[x]".into());
    for _ in 0..100 {
        doc = Document::Sequence(vec![doc]);
    }

    let err = resolver.resolve_document(&mut doc).await.unwrap_err();
    assert!(matches!(err, ResolveError::DepthExceeded { limit: 64 }));
    assert!(backend.calls().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolutions_share_cache() {
    let backend = RecordingBackend::with(&[("db", "pw"), ("api", "key")]);
    let cache = SecretCache::new();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let resolver = resolver_for(&backend, &cache);
            tokio::spawn(async move {
                let input = format!("id: n{i}\ndb: ENC[db]\napi: ENC[api]\n");
                resolver.resolve(input.as_bytes()).await.unwrap()
            })
        })
        .collect();

    let outputs = futures::future::join_all(tasks).await;
    for (i, out) in outputs.into_iter().enumerate() {
        let out = out.unwrap();
        assert_eq!(
            decoded(&out),
            yaml(&format!("id: n{i}\ndb: pw\napi: key\n"))
        );
    }

    assert_eq!(cache.get("db").as_deref(), Some("pw"));
    assert_eq!(cache.get("api").as_deref(), Some("key"));
    // Races may duplicate fetches, but every batch is distinct and ordered.
    for call in backend.calls() {
        assert!(call.len() <= 2);
    }
}
