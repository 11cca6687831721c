//! Wire payloads exchanged between pods.
//!
//! Both export representations use the video's own `uuid` as the
//! `remoteId` field: from the receiving peer's perspective this pod is
//! remote, so this pod's identifier is the canonical reference the
//! mirror will store.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vidpod_core::error::CoreError;
use vidpod_core::infohash::{self, INFO_HASH_PLACEHOLDER};
use vidpod_core::types::Timestamp;
use vidpod_db::models::video::VideoListRow;

/// Full representation announcing a newly created owned video,
/// including the thumbnail bytes in a binary-safe encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVideoPayload {
    /// This pod's identifier for the video -- the receiver's remote id.
    pub remote_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub info_hash: String,
    pub extname: String,
    /// Duration in seconds.
    pub duration: i32,
    pub author: String,
    /// The announcing pod's public authority.
    pub pod_host: String,
    pub tags: Vec<String>,
    /// Base64-encoded JPEG thumbnail.
    pub thumbnail_base64: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Metadata-only representation for propagating updates (tags,
/// description changes). No thumbnail bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoPayload {
    pub remote_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub info_hash: String,
    pub extname: String,
    pub duration: i32,
    pub author: String,
    pub pod_host: String,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Minimal removal event. Carries the owning pod's authority so the
/// receiver can scope the `remoteId` lookup, mirroring the other
/// payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveVideoPayload {
    pub name: String,
    pub remote_id: Uuid,
    pub pod_host: String,
}

/// The request body a pod POSTs to a peer's remote-videos endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum RemoteVideoRequest {
    Add(AddVideoPayload),
    Update(UpdateVideoPayload),
    Remove(RemoveVideoPayload),
}

/// Reject exporting records that are not safely shareable: only owned
/// videos leave this pod, and never with the placeholder info-hash.
fn check_exportable(row: &VideoListRow) -> Result<(), CoreError> {
    if !row.is_owned() {
        return Err(CoreError::Validation(format!(
            "Video {} is mirrored from a peer and is never re-exported",
            row.uuid
        )));
    }
    if row.info_hash == INFO_HASH_PLACEHOLDER {
        return Err(CoreError::Validation(format!(
            "Video {} still carries the placeholder info hash",
            row.uuid
        )));
    }
    infohash::validate(&row.info_hash)
}

impl AddVideoPayload {
    /// Build the add representation for an owned video.
    pub fn from_owned(
        row: &VideoListRow,
        pod_host: &str,
        thumbnail: &[u8],
    ) -> Result<Self, CoreError> {
        check_exportable(row)?;
        Ok(Self {
            remote_id: row.uuid,
            name: row.name.clone(),
            description: row.description.clone(),
            info_hash: row.info_hash.clone(),
            extname: row.extname.clone(),
            duration: row.duration,
            author: row.author_name.clone(),
            pod_host: pod_host.to_string(),
            tags: row.tag_names.clone(),
            thumbnail_base64: BASE64.encode(thumbnail),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Decode the transported thumbnail bytes.
    pub fn thumbnail_bytes(&self) -> Result<Vec<u8>, CoreError> {
        BASE64
            .decode(&self.thumbnail_base64)
            .map_err(|e| CoreError::Validation(format!("Invalid thumbnail encoding: {e}")))
    }
}

impl UpdateVideoPayload {
    /// Build the update representation for an owned video.
    pub fn from_owned(row: &VideoListRow, pod_host: &str) -> Result<Self, CoreError> {
        check_exportable(row)?;
        Ok(Self {
            remote_id: row.uuid,
            name: row.name.clone(),
            description: row.description.clone(),
            info_hash: row.info_hash.clone(),
            extname: row.extname.clone(),
            duration: row.duration,
            author: row.author_name.clone(),
            pod_host: pod_host.to_string(),
            tags: row.tag_names.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl RemoveVideoPayload {
    /// Build the removal event for an owned video.
    pub fn from_owned(row: &VideoListRow, pod_host: &str) -> Result<Self, CoreError> {
        if !row.is_owned() {
            return Err(CoreError::Validation(format!(
                "Video {} is mirrored from a peer; its removal is not broadcast",
                row.uuid
            )));
        }
        Ok(Self {
            name: row.name.clone(),
            remote_id: row.uuid,
            pod_host: pod_host.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const HASH: &str = "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3";

    fn owned_row() -> VideoListRow {
        VideoListRow {
            id: 1,
            uuid: Uuid::from_u128(1),
            remote_uuid: None,
            name: "Demo".into(),
            description: Some("A demo".into()),
            extname: ".mp4".into(),
            info_hash: HASH.into(),
            duration: 120,
            author_id: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            author_name: "alice".into(),
            pod_host: None,
            tag_names: vec!["demo".into()],
        }
    }

    #[test]
    fn add_payload_uses_own_uuid_as_remote_id() {
        let row = owned_row();
        let payload = AddVideoPayload::from_owned(&row, "pod.example.com:9000", b"jpeg").unwrap();
        assert_eq!(payload.remote_id, row.uuid);
        assert_eq!(payload.pod_host, "pod.example.com:9000");
        assert_eq!(payload.thumbnail_bytes().unwrap(), b"jpeg");
    }

    #[test]
    fn update_payload_has_no_thumbnail_field() {
        let row = owned_row();
        let payload = UpdateVideoPayload::from_owned(&row, "pod.example.com:9000").unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("thumbnailBase64").is_none());
        assert_eq!(json["remoteId"], row.uuid.to_string());
    }

    #[test]
    fn remove_payload_is_minimal() {
        let row = owned_row();
        let payload = RemoveVideoPayload::from_owned(&row, "pod.example.com:9000").unwrap();
        assert_eq!(payload.name, "Demo");
        assert_eq!(payload.remote_id, row.uuid);
        assert_eq!(payload.pod_host, "pod.example.com:9000");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn mirrored_rows_are_never_exported() {
        let mut row = owned_row();
        row.remote_uuid = Some(Uuid::from_u128(9));
        row.pod_host = Some("peer:9000".into());
        assert!(AddVideoPayload::from_owned(&row, "me", b"x").is_err());
        assert!(UpdateVideoPayload::from_owned(&row, "me").is_err());
        assert!(RemoveVideoPayload::from_owned(&row, "me").is_err());
    }

    #[test]
    fn placeholder_hash_is_never_exported() {
        let mut row = owned_row();
        row.info_hash = INFO_HASH_PLACEHOLDER.into();
        assert!(AddVideoPayload::from_owned(&row, "me", b"x").is_err());
        assert!(UpdateVideoPayload::from_owned(&row, "me").is_err());
    }

    #[test]
    fn request_envelope_round_trips() {
        let row = owned_row();
        let request = RemoteVideoRequest::Remove(RemoveVideoPayload::from_owned(&row, "me:9000").unwrap());
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"type\":\"remove\""));
        let back: RemoteVideoRequest = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, RemoteVideoRequest::Remove(p) if p.remote_id == row.uuid));
    }
}
