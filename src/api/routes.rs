//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, has_handler, health_handler, info_handler,
    keys_handler, set_handler, AppState,
};

/// Builds the cache router over one shared store.
///
/// Every route accepts cross-origin requests and is traced by `tower_http`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/all", delete(clear_handler))
        .route("/keys", get(keys_handler))
        .route("/has/:key", get(has_handler))
        .route("/info", get(info_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheOptions, FileCache};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use tower::util::ServiceExt;

    async fn create_test_app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::open(dir.path(), CacheOptions::default())
            .await
            .unwrap();
        (dir, create_router(AppState::new(cache)))
    }

    async fn status_of(app: &Router, method: Method, uri: &str) -> StatusCode {
        app.clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_read_routes_on_empty_cache() {
        let (_dir, app) = create_test_app().await;

        for uri in ["/health", "/info", "/keys", "/has/missing"] {
            assert_eq!(status_of(&app, Method::GET, uri).await, StatusCode::OK, "{}", uri);
        }
        assert_eq!(
            status_of(&app, Method::GET, "/get/missing").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_delete_routes_succeed_when_empty() {
        let (_dir, app) = create_test_app().await;

        assert_eq!(status_of(&app, Method::DELETE, "/del/missing").await, StatusCode::OK);
        assert_eq!(status_of(&app, Method::DELETE, "/all").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected() {
        let (_dir, app) = create_test_app().await;

        assert_eq!(
            status_of(&app, Method::GET, "/set").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            status_of(&app, Method::PUT, "/get/key").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[tokio::test]
    async fn test_set_route_accepts_json_body() {
        let (_dir, app) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/set")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"key":"test","value":[1,2,3]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
