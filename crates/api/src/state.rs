use std::sync::Arc;

use vidpod_federation::queue::FederationQueue;
use vidpod_pipeline::VideoLifecycle;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vidpod_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Video lifecycle orchestrator.
    pub lifecycle: Arc<VideoLifecycle>,
    /// Outbound federation queue.
    pub queue: FederationQueue,
}
