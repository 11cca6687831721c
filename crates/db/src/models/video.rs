//! Video entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use vidpod_core::error::CoreError;
use vidpod_core::identity::Ownership;
use vidpod_core::types::{DbId, Timestamp};

/// A video row from the `videos` table.
///
/// `remote_uuid IS NULL` is the authoritative ownership flag: NULL
/// means this pod owns the video and holds its raw media and derived
/// artifacts; non-NULL is the identifier assigned by the owning peer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub uuid: Uuid,
    pub remote_uuid: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    /// File extension with leading dot, e.g. `.mp4`.
    pub extname: String,
    /// 40-char hex content identity.
    pub info_hash: String,
    /// Duration in seconds.
    pub duration: i32,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Video {
    pub fn is_owned(&self) -> bool {
        self.remote_uuid.is_none()
    }

    /// Reconstruct the ownership enum. Mirrored videos need the owning
    /// pod's host, which callers obtain through the Author → Pod join.
    pub fn ownership(&self, pod_host: Option<String>) -> Result<Ownership, CoreError> {
        Ownership::from_parts(self.remote_uuid, pod_host)
    }
}

/// DTO for inserting a new video row.
#[derive(Debug, Clone)]
pub struct CreateVideo {
    pub uuid: Uuid,
    pub remote_uuid: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub extname: String,
    pub info_hash: String,
    pub duration: i32,
    pub author_id: DbId,
}

/// DTO for metadata updates. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVideo {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A video row joined with its author, pod, and tag names, as returned
/// by list and search queries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VideoListRow {
    pub id: DbId,
    pub uuid: Uuid,
    pub remote_uuid: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub extname: String,
    pub info_hash: String,
    pub duration: i32,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub author_name: String,
    /// `None` for locally authored videos.
    pub pod_host: Option<String>,
    pub tag_names: Vec<String>,
}

impl VideoListRow {
    pub fn is_owned(&self) -> bool {
        self.remote_uuid.is_none()
    }

    pub fn ownership(&self) -> Result<Ownership, CoreError> {
        Ownership::from_parts(self.remote_uuid, self.pod_host.clone())
    }
}
