//! Modification-time validated document cache.
//!
//! [`DocumentCache`] renders a Markdown file on first access and serves the
//! stored [`Document`] until the file's modification stamp changes.
//!
//! # Locking
//!
//! The entry map sits behind a single `RwLock`:
//! - Lookups take the shared guard, so readers of fresh entries never block
//!   each other.
//! - Publishing a rendered document takes the exclusive guard for the
//!   `insert` only. Stat, read and render all happen with no guard held, so a
//!   slow render never stalls lookups or renders of other paths.
//!
//! Two requests for the same stale path may both render it. On equal stamps
//! the first published entry stays. A render whose source changed underneath
//! it (checked by a second stat after rendering) is returned to its caller
//! but never published, so an older revision cannot replace a newer entry.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use mdserver_renderer::Renderer;

use crate::document::{Document, SourceVersion};
use crate::error::DocumentError;

/// Counters describing cache activity since construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from a fresh entry.
    pub hits: u64,
    /// Documents rendered because of a miss or a stale entry.
    pub renders: u64,
    /// Number of cached entries.
    pub entries: usize,
}

/// Thread-safe cache of rendered documents keyed by source path.
///
/// Construct one per process and share it behind an `Arc`. Entries live until
/// the cache is dropped; there is no eviction.
pub struct DocumentCache {
    renderer: Arc<dyn Renderer>,
    entries: RwLock<HashMap<PathBuf, Arc<Document>>>,
    hits: AtomicU64,
    renders: AtomicU64,
}

impl DocumentCache {
    /// Create an empty cache that renders with `renderer`.
    #[must_use]
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self {
            renderer,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            renders: AtomicU64::new(0),
        }
    }

    /// Get the rendered document for a Markdown source path.
    ///
    /// Renders the file on a miss or when its modification stamp differs from
    /// the cached one; otherwise returns the cached document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NotFound` if the path does not exist.
    /// Returns `DocumentError::Directory` if the path is a directory.
    /// Returns `DocumentError::Stat` if the path cannot be inspected.
    /// Returns `DocumentError::Read` if the file cannot be read. Nothing is
    /// cached in that case.
    pub fn get(&self, path: impl AsRef<Path>) -> Result<Arc<Document>, DocumentError> {
        let path = path.as_ref();

        let metadata = fs::metadata(path).map_err(|e| DocumentError::stat(path, e))?;
        if metadata.is_dir() {
            return Err(DocumentError::Directory(path.to_path_buf()));
        }
        let version =
            SourceVersion::from_metadata(&metadata).map_err(|source| DocumentError::Stat {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(document) = self.lookup(path, version) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(path = %path.display(), "Document cache hit");
            return Ok(document);
        }

        let document = Arc::new(self.render(path, version)?);

        // The file changed while rendering: answer this request, but leave
        // the entry to whoever rendered the newer revision.
        if !Self::is_current(path, version) {
            tracing::debug!(path = %path.display(), "Source changed during render, not caching");
            return Ok(document);
        }

        Ok(self.publish(path, document))
    }

    /// Number of cached documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    /// Whether the cache holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// Snapshot of cache counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            renders: self.renders.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    /// Return the cached document if its stamp matches `version`.
    fn lookup(&self, path: &Path, version: SourceVersion) -> Option<Arc<Document>> {
        self.read_entries()
            .get(path)
            .filter(|document| document.source_version == version)
            .map(Arc::clone)
    }

    /// Read and render the source file. Runs without any guard held.
    fn render(&self, path: &Path, version: SourceVersion) -> Result<Document, DocumentError> {
        let start = Instant::now();

        let bytes = fs::read(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let source = String::from_utf8_lossy(&bytes);
        let document = Document::render(&source, version, self.renderer.as_ref());

        self.renders.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            path = %path.display(),
            elapsed = ?start.elapsed(),
            "Rendered document"
        );

        Ok(document)
    }

    /// Whether the source still carries `version`. Runs without any guard held.
    fn is_current(path: &Path, version: SourceVersion) -> bool {
        fs::metadata(path)
            .and_then(|metadata| SourceVersion::from_metadata(&metadata))
            .is_ok_and(|current| current == version)
    }

    /// Store a fully built document, keeping an equal-stamp entry if one won the race.
    fn publish(&self, path: &Path, document: Arc<Document>) -> Arc<Document> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = entries.get(path)
            && existing.source_version == document.source_version
        {
            return Arc::clone(existing);
        }

        entries.insert(path.to_path_buf(), Arc::clone(&document));
        document
    }

    // The map is only changed by a single insert of a complete value, so a
    // poisoned guard still protects a consistent map.
    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, HashMap<PathBuf, Arc<Document>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}
