//! Video ownership state and deterministic artifact naming.
//!
//! File names are pure functions of (ownership, local uuid, extname):
//! owned artifacts are keyed by the local uuid, mirrored artifacts by
//! the identifier assigned by the owning pod. The thumbnail is the one
//! exception -- a local mirror copy is kept even for remote videos, so
//! it is always keyed by the local uuid.

use uuid::Uuid;

use crate::error::CoreError;

/// File extensions accepted for raw video uploads.
pub const ACCEPTED_EXTNAMES: &[&str] = &[".mp4", ".webm", ".ogv"];

/// Whether this pod owns a video or mirrors one owned by a peer.
///
/// Persisted storage encodes this as the nullability of `remote_uuid`;
/// in-memory code carries the enum so owned/mirrored branches are
/// exhaustive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership {
    /// Raw media and derived artifacts live on this pod.
    Owned,
    /// A local record for a video owned by a remote pod.
    Mirrored { remote_id: Uuid, pod_host: String },
}

impl Ownership {
    /// Reconstruct the ownership state from its persisted parts.
    ///
    /// `remote_id = None` means owned. A mirrored video must carry the
    /// owning pod's host (available through the Author → Pod join).
    pub fn from_parts(
        remote_id: Option<Uuid>,
        pod_host: Option<String>,
    ) -> Result<Self, CoreError> {
        match (remote_id, pod_host) {
            (None, _) => Ok(Self::Owned),
            (Some(remote_id), Some(pod_host)) => Ok(Self::Mirrored {
                remote_id,
                pod_host,
            }),
            (Some(remote_id), None) => Err(CoreError::Validation(format!(
                "Mirrored video {remote_id} has no owning pod host"
            ))),
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned)
    }

    /// The identifier the file names key on: the local uuid for owned
    /// videos, the owner-assigned uuid for mirrors.
    fn naming_id(&self, uuid: Uuid) -> Uuid {
        match self {
            Self::Owned => uuid,
            Self::Mirrored { remote_id, .. } => *remote_id,
        }
    }
}

/// Check that `extname` (with leading dot) is an accepted container type.
pub fn validate_extname(extname: &str) -> Result<(), CoreError> {
    if ACCEPTED_EXTNAMES.contains(&extname) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid extname '{extname}'. Must be one of: {ACCEPTED_EXTNAMES:?}"
        )))
    }
}

/// Raw media file name: `{uuid}{extname}` owned, `{remote_id}{extname}`
/// mirrored.
pub fn video_file_name(ownership: &Ownership, uuid: Uuid, extname: &str) -> String {
    format!("{}{extname}", ownership.naming_id(uuid))
}

/// Thumbnail file name, always keyed by the local uuid.
pub fn thumbnail_file_name(uuid: Uuid) -> String {
    format!("{uuid}.jpg")
}

/// Preview image file name, owned/mirrored branching like the video file.
pub fn preview_file_name(ownership: &Ownership, uuid: Uuid) -> String {
    format!("{}.jpg", ownership.naming_id(uuid))
}

/// Torrent descriptor file name, owned/mirrored branching like the
/// video file.
pub fn torrent_file_name(ownership: &Ownership, uuid: Uuid) -> String {
    format!("{}.torrent", ownership.naming_id(uuid))
}
