//! HTTP request handlers.

pub(crate) mod posts;

use axum::http::StatusCode;
use axum::response::Response;

use crate::error::error_page;

/// Fallback for paths no route matches.
pub(crate) async fn not_found() -> Response {
    error_page(StatusCode::NOT_FOUND)
}
