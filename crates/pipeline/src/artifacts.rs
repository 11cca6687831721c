//! Artifact generation pipeline for owned videos.
//!
//! Three independent, I/O-bound tasks run concurrently over the raw
//! media file: torrent encoding (which yields the info-hash), thumbnail
//! extraction, and preview extraction. The join fails on the first
//! observed error; siblings may run to completion and any partial
//! artifacts they leave behind are acceptable garbage for a later
//! maintenance pass.

use std::path::Path;

use uuid::Uuid;
use vidpod_core::config::{PodConfig, STATIC_WEBSEED_PATH};
use vidpod_core::ffmpeg::{self, THUMBNAIL_SIZE};
use vidpod_core::identity::{self, Ownership};
use vidpod_core::infohash;
use vidpod_core::torrent::{self, TorrentOptions};

use crate::error::PipelineError;

/// Generate all three derived artifacts for an owned video and return
/// the computed info-hash.
///
/// Only complete success is success: a failure in any task fails the
/// whole pipeline, and callers must treat that as "video creation
/// failed", never as "video created with missing artifacts".
pub async fn generate(
    uuid: Uuid,
    extname: &str,
    raw_path: &Path,
    config: &PodConfig,
) -> Result<String, PipelineError> {
    let ownership = Ownership::Owned;
    let video_name = identity::video_file_name(&ownership, uuid, extname);

    let torrent_task = encode_torrent(uuid, &video_name, raw_path, config);

    let thumbnail_task = async {
        ffmpeg::extract_frame(
            raw_path,
            &config.storage.thumbnails_dir,
            &identity::thumbnail_file_name(uuid),
            Some(THUMBNAIL_SIZE),
        )
        .await
        .map_err(|e| PipelineError::artifact("thumbnail", e))
    };

    let preview_task = async {
        ffmpeg::extract_frame(
            raw_path,
            &config.storage.previews_dir,
            &identity::preview_file_name(&ownership, uuid),
            None,
        )
        .await
        .map_err(|e| PipelineError::artifact("preview", e))
    };

    let (info_hash, _, _) = tokio::try_join!(torrent_task, thumbnail_task, preview_task)?;

    // The committed hash must be well-formed before the record can be
    // exposed to magnet generation or federation export.
    infohash::validate(&info_hash)?;
    Ok(info_hash)
}

/// Encode the torrent descriptor, write it to the torrents directory,
/// and decode the resulting info-hash.
async fn encode_torrent(
    uuid: Uuid,
    video_name: &str,
    raw_path: &Path,
    config: &PodConfig,
) -> Result<String, PipelineError> {
    let options = TorrentOptions {
        announce_list: vec![config.tracker.announce_url()],
        url_list: vec![format!(
            "{}{STATIC_WEBSEED_PATH}{video_name}",
            config.web.origin()
        )],
    };

    let bytes = torrent::encode(raw_path, video_name, &options)
        .await
        .map_err(|e| PipelineError::artifact("torrent", e))?;

    tokio::fs::create_dir_all(&config.storage.torrents_dir)
        .await
        .map_err(|e| PipelineError::artifact("torrent", e))?;
    let torrent_path = config
        .storage
        .torrents_dir
        .join(identity::torrent_file_name(&Ownership::Owned, uuid));
    tokio::fs::write(&torrent_path, &bytes)
        .await
        .map_err(|e| PipelineError::artifact("torrent", e))?;

    let summary = torrent::decode(&bytes).map_err(|e| PipelineError::artifact("torrent", e))?;
    Ok(summary.info_hash)
}
