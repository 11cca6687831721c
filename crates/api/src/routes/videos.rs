//! Route definitions for the video catalogue.
//!
//! Mounted at `/videos`.
//!
//! ```text
//! GET    /                      list_videos
//! POST   /                      upload_video (multipart)
//! GET    /search/{value}        search_videos
//! GET    /{uuid}                get_video
//! PUT    /{uuid}                update_video
//! DELETE /{uuid}                destroy_video
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos).post(videos::upload_video))
        .route("/search/{value}", get(videos::search_videos))
        .route(
            "/{uuid}",
            get(videos::get_video)
                .put(videos::update_video)
                .delete(videos::destroy_video),
        )
}
