//! The artifact store boundary.
//!
//! The store is an external collaborator: a pure read interface that
//! resolves a canonical URL (and optional version) to zero or more
//! candidate artifacts. Retry and fetch policy belong to the store
//! implementation, never to the walker.

use std::collections::HashMap;
use std::sync::Mutex;

use karp_model::artifact::Artifact;
use thiserror::Error;

/// Failure signals a store may raise. Both are surfaced as diagnostics by
/// the walker, never as an uncaught fault.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no artifact found for {0}")]
    NotFound(String),
    #[error("store I/O failure: {0}")]
    Io(String),
}

/// Read access to stored artifacts.
///
/// `version` of `None` means all versions sharing the URL. Implementations
/// must be side-effect-free from the caller's perspective, and internally
/// thread-safe when shared across concurrent resolutions.
pub trait ArtifactStore {
    fn read(&self, url: &str, version: Option<&str>) -> Result<Vec<Artifact>, StoreError>;
}

/// A simple in-process store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: Vec<Artifact>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl ArtifactStore for MemoryStore {
    fn read(&self, url: &str, version: Option<&str>) -> Result<Vec<Artifact>, StoreError> {
        Ok(self
            .artifacts
            .iter()
            .filter(|a| a.id.url == url)
            .filter(|a| version.is_none() || a.id.version.as_deref() == version)
            .cloned()
            .collect())
    }
}

/// A read-through cache in front of another store.
///
/// Keyed by `(url, version)` with at-most-once population per key: the
/// inner store is consulted under the cache lock, so concurrent readers of
/// the same key cannot race a duplicate fetch. Errors are not cached.
///
/// The cache has an explicit lifecycle: the embedder creates it, shares it
/// behind the `ArtifactStore` trait, and drops or [`clear`](Self::clear)s
/// it when the underlying store is invalidated. It is never global.
pub struct CachingStore<S> {
    inner: S,
    cache: Mutex<HashMap<(String, Option<String>), Vec<Artifact>>>,
}

impl<S: ArtifactStore> CachingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Discard all cached entries.
    pub fn clear(&self) {
        self.lock_cache().clear();
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<(String, Option<String>), Vec<Artifact>>> {
        // A poisoned lock only means another reader panicked mid-read; the
        // map itself is still coherent.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: ArtifactStore> ArtifactStore for CachingStore<S> {
    fn read(&self, url: &str, version: Option<&str>) -> Result<Vec<Artifact>, StoreError> {
        let key = (url.to_string(), version.map(str::to_string));
        let mut cache = self.lock_cache();
        if let Some(hit) = cache.get(&key) {
            return Ok(hit.clone());
        }
        let candidates = self.inner.read(url, version)?;
        cache.insert(key, candidates.clone());
        Ok(candidates)
    }
}
