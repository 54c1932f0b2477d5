//! Document cache for mdserver.
//!
//! This crate provides the shared, lazily-populated store that maps a
//! Markdown source path to its rendered [`Document`]:
//!
//! - [`DocumentCache`]: Thread-safe cache validated by source modification time
//! - [`Document`]: Rendered title, body markup and [`SourceVersion`]
//! - [`DocumentError`]: Failures classified into a [`FailureKind`]
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use mdserver_cache::DocumentCache;
//! use mdserver_renderer::HtmlRenderer;
//!
//! let cache = DocumentCache::new(Arc::new(HtmlRenderer::new()));
//!
//! let document = cache.get("posts/index.md")?;
//! println!("{}: {}", document.title, document.body);
//! # Ok(())
//! # }
//! ```
//!
//! # Freshness
//!
//! Entries are never invalidated eagerly. Every [`DocumentCache::get`] stats
//! the source file and compares its modification time against the stored
//! [`SourceVersion`]; a mismatch triggers a re-render that overwrites the entry.
//! A file rewritten within the filesystem timestamp resolution keeps its old
//! stamp and is served stale until its next modification.

mod cache;
mod document;
mod error;

pub use cache::{CacheStats, DocumentCache};
pub use document::{Document, SourceVersion, split_title};
pub use error::{DocumentError, FailureKind};

// Re-export renderer types for convenience
pub use mdserver_renderer::{HtmlRenderer, Renderer};
