//! HTTP server for mdserver.
//!
//! Serves Markdown posts as rendered HTML pages using axum:
//! - `/`, `/{page}`, `/{page}/`: posts rendered through the [`DocumentCache`]
//! - `/static/*`, `/uploads/*`: files from the configured directories
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use mdserver_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         listen: "127.0.0.1:3000".to_string(),
//!         posts_dir: PathBuf::from("posts"),
//!         static_dir: PathBuf::from("public/static"),
//!         upload_dir: PathBuf::from("public/uploads"),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (mdserver-server)
//!                        │
//!                        ├─► Post routes ──► spawn_blocking ──► DocumentCache::get
//!                        │                                         │
//!                        │                   template ◄── Document ┘
//!                        │
//!                        └─► /static, /uploads (tower-http ServeDir)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod static_files;
mod template;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use mdserver_cache::DocumentCache;
use mdserver_renderer::HtmlRenderer;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address to bind to, as `host:port`.
    pub listen: String,
    /// Directory holding Markdown posts.
    pub posts_dir: PathBuf,
    /// Directory served under `/static/`.
    pub static_dir: PathBuf,
    /// Directory served under `/uploads/`.
    pub upload_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:3000".to_owned(),
            posts_dir: PathBuf::from("posts"),
            static_dir: PathBuf::from("public/static"),
            upload_dir: PathBuf::from("public/uploads"),
        }
    }
}

/// Build the application router around a shared document cache.
pub fn build_app(config: &ServerConfig, documents: Arc<DocumentCache>) -> Router {
    let state = Arc::new(AppState {
        documents,
        posts_dir: config.posts_dir.clone(),
    });
    app::create_router(state, &config.static_dir, &config.upload_dir)
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listen address cannot be bound or serving fails.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let documents = Arc::new(DocumentCache::new(Arc::new(HtmlRenderer::new())));
    let app = build_app(&config, Arc::clone(&documents));

    let listener = tokio::net::TcpListener::bind(config.listen.as_str()).await?;
    tracing::info!(address = %listener.local_addr()?, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let stats = documents.stats();
    tracing::info!(
        hits = stats.hits,
        renders = stats.renders,
        entries = stats.entries,
        "Document cache statistics"
    );

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from the loaded mdserver config.
#[must_use]
pub fn server_config_from_config(config: &mdserver_config::Config) -> ServerConfig {
    ServerConfig {
        listen: config.server.listen.clone(),
        posts_dir: config.paths_resolved.posts_dir.clone(),
        static_dir: config.paths_resolved.static_dir.clone(),
        upload_dir: config.paths_resolved.upload_dir.clone(),
    }
}
