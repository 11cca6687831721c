//! Tag entity model.

use serde::Serialize;
use sqlx::FromRow;
use vidpod_core::types::DbId;

/// A tag attached to videos through the `video_tags` relation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
}
