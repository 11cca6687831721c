//! Application router assembly.
//!
//! [`build_app_router`] is the single place the route tree and
//! middleware stack are wired together; `main.rs` and the integration
//! tests both go through it so they exercise identical plumbing.

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use vidpod_core::config::{
    STATIC_PREVIEWS_PATH, STATIC_THUMBNAILS_PATH, STATIC_TORRENTS_PATH, STATIC_WEBSEED_PATH,
};

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Assemble the complete [`Router`]: health probe, the `/api/v1` tree,
/// the static artifact mounts, and the middleware stack (reading the
/// `.layer` calls top to bottom gives the response path; requests
/// traverse them in reverse).
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static("x-request-id");
    let storage = &config.pod.storage;

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        // Artifacts are plain files; peers and BitTorrent clients fetch
        // them without going through a handler. The webseed mount serves
        // the raw media files referenced from every magnet URI.
        .nest_service(
            STATIC_TORRENTS_PATH.trim_end_matches('/'),
            ServeDir::new(&storage.torrents_dir),
        )
        .nest_service(
            STATIC_WEBSEED_PATH.trim_end_matches('/'),
            ServeDir::new(&storage.videos_dir),
        )
        .nest_service(
            STATIC_THUMBNAILS_PATH.trim_end_matches('/'),
            ServeDir::new(&storage.thumbnails_dir),
        )
        .nest_service(
            STATIC_PREVIEWS_PATH.trim_end_matches('/'),
            ServeDir::new(&storage.previews_dir),
        )
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// CORS layer from the configured origin allowlist.
///
/// An unparseable origin panics here, at startup, rather than being
/// silently dropped from the allowlist.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
