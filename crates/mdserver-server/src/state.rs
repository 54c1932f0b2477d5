//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use mdserver_cache::DocumentCache;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Rendered documents, shared by every request.
    pub(crate) documents: Arc<DocumentCache>,
    /// Directory holding Markdown posts.
    pub(crate) posts_dir: PathBuf,
}
