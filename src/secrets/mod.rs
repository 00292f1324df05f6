//! Encrypted-secret placeholder resolution.
//!
//! Configuration documents may carry string values of the form
//! `ENC[handle]`. Resolution walks the decoded tree, fetches every unknown
//! handle from a [`SecretBackend`] in one batch, and rewrites the values in
//! place, reusing a [`SecretCache`] across calls.

pub mod backend;
pub mod cache;
pub mod document;
pub mod error;
pub mod resolver;
pub mod token;
pub mod walker;

pub use backend::{EnvBackend, FileBackend, SecretBackend, StaticBackend};
pub use cache::SecretCache;
pub use document::{decode, encode, Document, DocumentFormat, TaggedDocument};
pub use error::{BackendError, ResolveError};
pub use resolver::{audit, PlaceholderRef, ResolutionReport, SecretResolver};
pub use token::{detect, placeholder};
pub use walker::{visit, walk, DEFAULT_MAX_DEPTH};
