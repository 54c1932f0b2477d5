//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use mdserver_cache::{DocumentError, FailureKind};

use crate::template;

/// Server error type.
///
/// Details are logged server-side; clients only see the status page.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Page name cannot map to a post file.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Document lookup failed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Page template failed to render.
    #[error("Template error: {0}")]
    Template(std::fmt::Error),

    /// Blocking document task panicked or was cancelled.
    #[error("Document task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::PageNotFound(_) => StatusCode::NOT_FOUND,
            Self::Document(e) => match e.kind() {
                FailureKind::NotFound => StatusCode::NOT_FOUND,
                FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Template(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::info!(status = status.as_u16(), error = %self, "Request failed");
        }
        error_page(status)
    }
}

/// Render the error page for `status`, falling back to plain text.
pub(crate) fn error_page(status: StatusCode) -> Response {
    match template::render_error(status) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render error page");
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            (status, status.canonical_reason().unwrap_or_default()).into_response()
        }
    }
}
