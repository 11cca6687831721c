//! Peer pod entity model.

use serde::Serialize;
use sqlx::FromRow;
use vidpod_core::types::{DbId, Timestamp};

/// A peer server participating in the federation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Pod {
    pub id: DbId,
    /// Public authority of the peer, e.g. `peer.example.com:9000`.
    pub host: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
