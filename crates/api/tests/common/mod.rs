use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use vidpod_api::config::ServerConfig;
use vidpod_api::router::build_app_router;
use vidpod_api::state::AppState;
use vidpod_core::config::{PodConfig, StorageConfig, TrackerConfig, WebConfig};
use vidpod_federation::queue::FederationQueue;
use vidpod_pipeline::VideoLifecycle;

/// Build a test `ServerConfig` with safe defaults and a throwaway
/// storage root unique to this test.
pub fn test_config() -> ServerConfig {
    let storage_root = std::env::temp_dir().join(format!("vidpod-test-{}", Uuid::new_v4()));
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        pod: PodConfig {
            web: WebConfig {
                scheme: "http".into(),
                hostname: "localhost".into(),
                port: 9000,
            },
            tracker: TrackerConfig {
                scheme: "ws".into(),
                hostname: "localhost".into(),
                port: 9001,
            },
            storage: StorageConfig::under_root(&storage_root),
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses. The federation
/// receiver is dropped: outbound events are silently discarded, which
/// is exactly the best-effort contract.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let (queue, _receiver) = FederationQueue::new();

    let lifecycle = Arc::new(VideoLifecycle::new(
        pool.clone(),
        config.pod.clone(),
        queue.clone(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        lifecycle,
        queue,
    };

    build_app_router(state, &config)
}

/// Send a GET request to the app.
pub async fn get(app: Router, path: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a PUT request with a JSON body.
pub async fn put_json(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a DELETE request.
pub async fn delete(app: Router, path: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into parsed JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a status code with the body included in the failure message.
pub async fn assert_status(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {json}");
    json
}
