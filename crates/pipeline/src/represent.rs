//! Client-facing video representation.
//!
//! The API never exposes database ids or the raw `remote_uuid` column;
//! clients see the local `uuid`, an `isLocal` flag, and a ready-made
//! magnet URI pointing at whichever pod actually seeds the content.

use serde::Serialize;
use uuid::Uuid;
use vidpod_core::config::{PodConfig, STATIC_THUMBNAILS_PATH};
use vidpod_core::error::CoreError;
use vidpod_core::identity;
use vidpod_core::infohash::INFO_HASH_PLACEHOLDER;
use vidpod_core::magnet::MagnetDescriptor;
use vidpod_core::types::Timestamp;
use vidpod_db::models::video::VideoListRow;

/// What a client sees when listing, searching, or fetching a video.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicVideo {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub author: String,
    /// `None` when this pod authored the video.
    pub pod_host: Option<String>,
    pub is_local: bool,
    pub magnet_uri: String,
    /// Duration in seconds.
    pub duration: i32,
    pub tags: Vec<String>,
    pub thumbnail_path: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PublicVideo {
    /// Build the public representation from a joined row.
    ///
    /// Fails on rows still carrying the placeholder info-hash; those
    /// must never leave the pipeline, so hitting one here is a bug
    /// worth surfacing rather than masking.
    pub fn from_row(row: &VideoListRow, config: &PodConfig) -> Result<Self, CoreError> {
        if row.info_hash == INFO_HASH_PLACEHOLDER {
            return Err(CoreError::Internal(format!(
                "Video {} reached representation with the placeholder info hash",
                row.uuid
            )));
        }

        let ownership = row.ownership()?;
        let magnet_uri = MagnetDescriptor::for_video(
            &ownership,
            row.uuid,
            &row.extname,
            &row.info_hash,
            &row.name,
            &config.web,
            &config.tracker,
        )?
        .encode()?;

        Ok(Self {
            id: row.uuid,
            name: row.name.clone(),
            description: row.description.clone(),
            author: row.author_name.clone(),
            pod_host: row.pod_host.clone(),
            is_local: row.is_owned(),
            magnet_uri,
            duration: row.duration,
            tags: row.tag_names.clone(),
            thumbnail_path: format!(
                "{STATIC_THUMBNAILS_PATH}{}",
                identity::thumbnail_file_name(row.uuid)
            ),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
