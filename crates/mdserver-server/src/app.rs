//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>, static_dir: &Path, upload_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handlers::posts::get_index))
        .route("/{page}", get(handlers::posts::get_post))
        .route("/{page}/", get(handlers::posts::get_post))
        .merge(static_files::static_router(static_dir, upload_dir))
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use mdserver_cache::{DocumentCache, HtmlRenderer};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::{ServerConfig, build_app};

    struct Fixture {
        _dir: TempDir,
        posts: PathBuf,
        app: Router,
    }

    fn write_post(path: &std::path::Path, content: &str, secs: u64) {
        fs::write(path, content).unwrap();
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("posts");
        let static_dir = dir.path().join("static");
        let upload_dir = dir.path().join("uploads");
        fs::create_dir_all(posts.join("dir.md")).unwrap();
        fs::create_dir_all(static_dir.join("sub")).unwrap();
        fs::create_dir_all(&upload_dir).unwrap();

        write_post(&posts.join("index.md"), "Welcome\nThis is **home**.\n", 1_700_000_000);
        write_post(&posts.join("hello.md"), "Hello\nWorld\n", 1_700_000_000);
        fs::write(static_dir.join("style.css"), "body { margin: 0; }\n").unwrap();
        fs::write(upload_dir.join("a.txt"), "attachment\n").unwrap();

        let config = ServerConfig {
            listen: "127.0.0.1:0".to_owned(),
            posts_dir: posts.clone(),
            static_dir,
            upload_dir,
        };
        let documents = Arc::new(DocumentCache::new(Arc::new(HtmlRenderer::new())));
        let app = build_app(&config, documents);

        Fixture {
            _dir: dir,
            posts,
            app,
        }
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_post() {
        let fx = fixture();

        let response = get(&fx.app, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<title>Welcome</title>"));
        assert!(body.contains("<p>This is <strong>home</strong>.</p>"));
    }

    #[tokio::test]
    async fn test_post_headers() {
        let fx = fixture();

        let response = get(&fx.app, "/hello").await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert!(headers.contains_key(header::ETAG));
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(
            headers[header::LAST_MODIFIED],
            "Tue, 14 Nov 2023 22:13:20 GMT"
        );
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert!(
            headers[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_serves_post() {
        let fx = fixture();

        let response = get(&fx.app, "/hello/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<p>World</p>"));
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let fx = fixture();

        let response = get(&fx.app, "/nope").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("404 Not Found"));
    }

    #[tokio::test]
    async fn test_directory_post_is_not_found() {
        let fx = fixture();

        let response = get(&fx.app, "/dir").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_escaping_page_is_not_found() {
        let fx = fixture();

        let response = get(&fx.app, "/..").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_if_none_match_returns_not_modified() {
        let fx = fixture();
        let first = get(&fx.app, "/hello").await;
        let etag = first.headers()[header::ETAG].clone();

        let response = fx
            .app
            .clone()
            .oneshot(
                Request::get("/hello")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        let headers = response.headers();
        assert_eq!(headers[header::ETAG], first.headers()[header::ETAG]);
        assert_eq!(
            headers[header::LAST_MODIFIED],
            "Tue, 14 Nov 2023 22:13:20 GMT"
        );
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    }

    #[tokio::test]
    async fn test_weak_etag_in_list_returns_not_modified() {
        let fx = fixture();
        let first = get(&fx.app, "/hello").await;
        let etag = first.headers()[header::ETAG].to_str().unwrap().to_owned();

        let response = fx
            .app
            .clone()
            .oneshot(
                Request::get("/hello")
                    .header(header::IF_NONE_MATCH, format!("\"other\", W/{etag}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_modified_post_is_rerendered() {
        let fx = fixture();
        let first = get(&fx.app, "/hello").await;
        let etag = first.headers()[header::ETAG].clone();

        write_post(&fx.posts.join("hello.md"), "Hello\nAgain\n", 1_700_000_100);
        let response = get(&fx.app, "/hello").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_ne!(response.headers()[header::ETAG], etag);
        assert!(body_text(response).await.contains("<p>Again</p>"));
    }

    #[tokio::test]
    async fn test_static_file() {
        let fx = fixture();

        let response = get(&fx.app, "/static/style.css").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "body { margin: 0; }\n");
    }

    #[tokio::test]
    async fn test_upload_file() {
        let fx = fixture();

        let response = get(&fx.app, "/uploads/a.txt").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "attachment\n");
    }

    #[tokio::test]
    async fn test_static_directory_listing_is_not_found() {
        let fx = fixture();

        for uri in ["/static/", "/static/sub/", "/static/sub", "/uploads/"] {
            let response = get(&fx.app, uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_missing_static_file_gets_error_page() {
        let fx = fixture();

        let response = get(&fx.app, "/static/missing.css").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("404 Not Found"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let fx = fixture();

        let response = get(&fx.app, "/a/b/c").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
    }
}
