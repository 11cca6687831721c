//! Handler for inbound federation events.
//!
//! Peers POST [`RemoteVideoRequest`] envelopes here. Add events create
//! mirrors, update events patch them, remove events destroy them.
//! Events referring to unknown videos are acknowledged and ignored so a
//! replaying peer never wedges on our state.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use vidpod_federation::payload::RemoteVideoRequest;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/remote/videos
pub async fn receive_event(
    State(state): State<AppState>,
    Json(request): Json<RemoteVideoRequest>,
) -> AppResult<StatusCode> {
    match request {
        RemoteVideoRequest::Add(payload) => {
            tracing::info!(
                remote_id = %payload.remote_id,
                pod = %payload.pod_host,
                "Mirroring announced video"
            );
            state.lifecycle.mirror(payload).await?;
        }
        RemoteVideoRequest::Update(payload) => {
            tracing::info!(
                remote_id = %payload.remote_id,
                pod = %payload.pod_host,
                "Applying remote update"
            );
            state.lifecycle.apply_remote_update(payload).await?;
        }
        RemoteVideoRequest::Remove(payload) => {
            tracing::info!(
                remote_id = %payload.remote_id,
                pod = %payload.pod_host,
                "Applying remote removal"
            );
            state.lifecycle.apply_remote_remove(payload).await?;
        }
    }
    Ok(StatusCode::NO_CONTENT)
}
