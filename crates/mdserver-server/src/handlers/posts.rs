//! Post pages.
//!
//! Maps a page name to a Markdown file under the posts directory, fetches
//! the rendered document from the cache and wraps it in the post template.

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use mdserver_cache::Document;

use crate::error::ServerError;
use crate::state::AppState;
use crate::template;

/// Handle GET / (the index post).
pub(crate) async fn get_index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    render_post(state, String::new(), &headers).await
}

/// Handle GET /{page} and GET /{page}/.
pub(crate) async fn get_post(
    Path(page): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    render_post(state, page, &headers).await
}

async fn render_post(
    state: Arc<AppState>,
    page: String,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let Some(source) = resolve_source(&state.posts_dir, &page) else {
        return Err(ServerError::PageNotFound(page));
    };

    // Stat, read and render block; keep them off the async workers.
    let document =
        tokio::task::spawn_blocking(move || state.documents.get(&source)).await??;

    let etag = compute_etag(&document);
    let last_modified: DateTime<Utc> = document.source_version.system_time().into();
    let validators = [
        (header::ETAG, etag),
        (
            header::LAST_MODIFIED,
            last_modified
                .format("%a, %d %b %Y %H:%M:%S GMT")
                .to_string(),
        ),
        (header::CACHE_CONTROL, "no-cache".to_owned()),
    ];

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match_matches(if_none_match.as_bytes(), &validators[0].1)
    {
        return Ok((StatusCode::NOT_MODIFIED, validators).into_response());
    }

    let html = template::render_post(&document).map_err(ServerError::Template)?;
    Ok((validators, Html(html)).into_response())
}

/// Map a page name to its source file.
///
/// The empty name is the index post. Names that could leave the posts
/// directory yield `None`.
fn resolve_source(posts_dir: &FsPath, page: &str) -> Option<PathBuf> {
    if page.is_empty() {
        return Some(posts_dir.join("index.md"));
    }
    if page == "." || page == ".." || page.contains(['/', '\\', '\0']) {
        return None;
    }
    Some(posts_dir.join(format!("{page}.md")))
}

/// Whether an `If-None-Match` value matches `etag`.
///
/// Accepts `*` and comma-separated lists. Comparison is weak: a `W/` prefix
/// on either side is ignored.
fn if_none_match_matches(value: &[u8], etag: &str) -> bool {
    let Ok(value) = std::str::from_utf8(value) else {
        return false;
    };
    let etag = etag.strip_prefix("W/").unwrap_or(etag);
    value.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

/// Compute `ETag` from source version and rendered content.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(document: &Document) -> String {
    let mut hasher = Md5::new();
    hasher.update(document.source_version.unix_nanos().to_le_bytes());
    hasher.update(document.title.as_bytes());
    hasher.update([0]);
    hasher.update(document.body.as_bytes());
    format!("\"{}\"", &hex::encode(hasher.finalize())[..16])
}
