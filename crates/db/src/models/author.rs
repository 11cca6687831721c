//! Author entity model.

use serde::Serialize;
use sqlx::FromRow;
use vidpod_core::types::{DbId, Timestamp};

/// A video author. A `NULL` pod means the author is local to this pod.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Author {
    pub id: DbId,
    pub name: String,
    pub pod_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
