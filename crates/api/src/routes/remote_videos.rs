//! Route definitions for inbound federation.
//!
//! Mounted at `/remote/videos`. Peers POST their synchronization
//! events here.

use axum::routing::post;
use axum::Router;

use crate::handlers::remote_videos;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(remote_videos::receive_event))
}
