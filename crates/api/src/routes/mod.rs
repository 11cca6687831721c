pub mod health;
pub mod remote_videos;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /videos                      list (GET), upload (POST multipart)
/// /videos/search/{value}       search (GET, ?field=&limit=&offset=&sort=)
/// /videos/{uuid}               get, update (PUT), destroy (DELETE)
///
/// /remote/videos               inbound federation events (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/videos", videos::router())
        .nest("/remote/videos", remote_videos::router())
}
