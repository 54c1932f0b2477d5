//! Static file serving.
//!
//! Files under the static and upload directories are served as-is by
//! `tower-http`'s `ServeDir`. Directory listings are never produced: any
//! request naming a directory gets the 404 error page.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use tower_http::services::ServeDir;

use crate::error::error_page;
use crate::state::AppState;

/// Create router serving `/static/*` and `/uploads/*`.
pub(crate) fn static_router(static_dir: &Path, upload_dir: &Path) -> Router<Arc<AppState>> {
    Router::new()
        .nest_service("/static", serve_dir(static_dir))
        .nest_service("/uploads", serve_dir(upload_dir))
        .layer(middleware::from_fn(reject_directories))
}

fn serve_dir(dir: &Path) -> ServeDir {
    ServeDir::new(dir).append_index_html_on_directories(false)
}

/// Answer directory requests and missing files with the error page.
async fn reject_directories(req: Request, next: Next) -> Response {
    if req.uri().path().ends_with('/') {
        return error_page(StatusCode::NOT_FOUND);
    }

    let response = next.run(req).await;
    if response.status() == StatusCode::NOT_FOUND {
        return error_page(StatusCode::NOT_FOUND);
    }
    response
}
