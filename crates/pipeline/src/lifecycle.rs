//! Video lifecycle orchestration.
//!
//! This is the single entry point for every state change a video can
//! undergo: local creation (with artifact generation), mirroring a
//! peer's announcement, metadata updates, and destruction. Handlers
//! stay thin and call into here; federation side effects are published
//! to the outbound queue and never block or fail the local operation.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use uuid::Uuid;
use vidpod_core::config::PodConfig;
use vidpod_core::error::CoreError;
use vidpod_core::ffmpeg;
use vidpod_core::identity::{self, Ownership};
use vidpod_core::infohash::INFO_HASH_PLACEHOLDER;
use vidpod_core::types::DbId;
use vidpod_core::video_rules;
use vidpod_db::models::video::{CreateVideo, UpdateVideo, VideoListRow};
use vidpod_db::repositories::{AuthorRepo, PodRepo, TagRepo, VideoRepo};
use vidpod_db::DbPool;
use vidpod_federation::payload::{AddVideoPayload, RemoveVideoPayload, UpdateVideoPayload};
use vidpod_federation::queue::{FederationEvent, FederationQueue};

use crate::artifacts;
use crate::error::{CleanupFailure, CleanupReport, PipelineError};

/// Metadata accompanying a raw media upload.
#[derive(Debug, Clone)]
pub struct NewOwnedVideo {
    pub name: String,
    pub description: Option<String>,
    pub author: String,
    pub tags: Vec<String>,
    /// File extension with leading dot, taken from the uploaded file name.
    pub extname: String,
}

/// Orchestrates video state changes against storage, the database, and
/// the federation queue.
pub struct VideoLifecycle {
    pool: DbPool,
    config: PodConfig,
    queue: FederationQueue,
}

impl VideoLifecycle {
    pub fn new(pool: DbPool, config: PodConfig, queue: FederationQueue) -> Self {
        Self {
            pool,
            config,
            queue,
        }
    }

    /// This pod's authority as peers will store it.
    fn local_host(&self) -> String {
        format!("{}:{}", self.config.web.hostname, self.config.web.port)
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Create an owned video from uploaded media bytes.
    ///
    /// All-or-nothing: the database row is only inserted once every
    /// artifact has been generated and the info-hash computed, so a
    /// placeholder hash never becomes externally visible. On pipeline
    /// failure the raw file is removed again best-effort.
    pub async fn create_owned(
        &self,
        meta: NewOwnedVideo,
        file_bytes: &[u8],
    ) -> Result<VideoListRow, PipelineError> {
        video_rules::validate_name(&meta.name)?;
        video_rules::validate_description(meta.description.as_deref())?;
        identity::validate_extname(&meta.extname)?;
        video_rules::validate_tags(&meta.tags)?;

        let uuid = Uuid::new_v4();
        let ownership = Ownership::Owned;
        let video_name = identity::video_file_name(&ownership, uuid, &meta.extname);

        tokio::fs::create_dir_all(&self.config.storage.videos_dir).await?;
        let raw_path = self.config.storage.videos_dir.join(&video_name);
        tokio::fs::write(&raw_path, file_bytes).await?;

        match self.build_owned(uuid, &meta, &raw_path).await {
            Ok(row) => {
                self.announce_created(&row).await;
                Ok(row)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&raw_path).await {
                    tracing::warn!(
                        path = %raw_path.display(),
                        error = %cleanup,
                        "Failed to remove raw file after pipeline failure"
                    );
                }
                Err(e)
            }
        }
    }

    /// Probe, generate artifacts, and persist. Split out so the caller
    /// can clean up the raw file on any failure.
    async fn build_owned(
        &self,
        uuid: Uuid,
        meta: &NewOwnedVideo,
        raw_path: &Path,
    ) -> Result<VideoListRow, PipelineError> {
        let duration = ffmpeg::probe_duration(raw_path)
            .await
            .map_err(|e| PipelineError::artifact("probe", e))?;

        // Full-record check with the placeholder standing in for the
        // hash the pipeline has not computed yet.
        video_rules::validate_record(
            &meta.name,
            meta.description.as_deref(),
            &meta.extname,
            INFO_HASH_PLACEHOLDER,
            duration,
            &meta.tags,
        )?;

        let info_hash =
            artifacts::generate(uuid, &meta.extname, raw_path, &self.config).await?;

        let author = AuthorRepo::find_or_create(&self.pool, &meta.author, None).await?;
        let video = VideoRepo::create(
            &self.pool,
            &CreateVideo {
                uuid,
                remote_uuid: None,
                name: meta.name.clone(),
                description: meta.description.clone(),
                extname: meta.extname.clone(),
                info_hash,
                duration: duration as i32,
                author_id: author.id,
            },
        )
        .await?;
        TagRepo::set_for_video(&self.pool, video.id, &meta.tags).await?;

        VideoRepo::find_list_row(&self.pool, uuid)
            .await?
            .ok_or_else(|| {
                PipelineError::Core(CoreError::NotFound {
                    entity: "video",
                    id: uuid.to_string(),
                })
            })
    }

    /// Broadcast the creation to every known pod. Best-effort: a
    /// missing thumbnail or unbuildable payload is logged and skipped,
    /// never surfaced to the uploader.
    async fn announce_created(&self, row: &VideoListRow) {
        let thumbnail_path = self
            .config
            .storage
            .thumbnails_dir
            .join(identity::thumbnail_file_name(row.uuid));
        let thumbnail = match tokio::fs::read(&thumbnail_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    video = %row.uuid,
                    error = %e,
                    "Thumbnail unreadable; skipping federation announcement"
                );
                return;
            }
        };
        match AddVideoPayload::from_owned(row, &self.local_host(), &thumbnail) {
            Ok(payload) => self.queue.publish(FederationEvent::AddVideo {
                to_host: None,
                payload,
            }),
            Err(e) => {
                tracing::warn!(video = %row.uuid, error = %e, "Video not exportable");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Mirroring
    // -----------------------------------------------------------------------

    /// Store a peer's announcement as a mirrored video.
    ///
    /// Idempotent on `(remote_id, pod_host)`: replaying an announcement
    /// returns the existing mirror rather than duplicating it. No raw
    /// media, torrent, or preview is stored; only the transported
    /// thumbnail lands on disk, and it lands before the row is
    /// inserted so a failed write never leaves a thumbnail-less mirror
    /// behind.
    ///
    /// An announcement from a pod we have never seen before also
    /// triggers a catalogue announcement back to that pod.
    pub async fn mirror(&self, payload: AddVideoPayload) -> Result<VideoListRow, PipelineError> {
        if payload.info_hash == INFO_HASH_PLACEHOLDER {
            return Err(CoreError::Validation(
                "Announced video carries the placeholder info hash".into(),
            )
            .into());
        }
        video_rules::validate_record(
            &payload.name,
            payload.description.as_deref(),
            &payload.extname,
            &payload.info_hash,
            i64::from(payload.duration),
            &payload.tags,
        )?;

        if let Some(existing) =
            VideoRepo::find_by_remote_uuid(&self.pool, payload.remote_id, &payload.pod_host)
                .await?
        {
            tracing::debug!(
                remote_id = %payload.remote_id,
                pod = %payload.pod_host,
                "Announcement replayed; mirror already present"
            );
            return VideoRepo::find_list_row(&self.pool, existing.uuid)
                .await?
                .ok_or_else(|| {
                    PipelineError::Core(CoreError::NotFound {
                        entity: "video",
                        id: existing.uuid.to_string(),
                    })
                });
        }

        let newly_known = PodRepo::find_by_host(&self.pool, &payload.pod_host)
            .await?
            .is_none();
        let pod = PodRepo::find_or_create(&self.pool, &payload.pod_host).await?;
        let author = AuthorRepo::find_or_create(&self.pool, &payload.author, Some(pod.id)).await?;

        // The thumbnail is keyed by the local uuid and written first:
        // the row must never exist without it.
        let uuid = Uuid::new_v4();
        let thumbnail = payload.thumbnail_bytes()?;
        tokio::fs::create_dir_all(&self.config.storage.thumbnails_dir).await?;
        let thumbnail_path = self
            .config
            .storage
            .thumbnails_dir
            .join(identity::thumbnail_file_name(uuid));
        tokio::fs::write(&thumbnail_path, &thumbnail).await?;

        let row = match self.insert_mirror(uuid, &payload, author.id).await {
            Ok(row) => row,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&thumbnail_path).await {
                    tracing::warn!(
                        path = %thumbnail_path.display(),
                        error = %cleanup,
                        "Failed to remove thumbnail after mirror failure"
                    );
                }
                return Err(e);
            }
        };

        if newly_known {
            self.announce_catalogue_to(&payload.pod_host).await;
        }
        Ok(row)
    }

    async fn insert_mirror(
        &self,
        uuid: Uuid,
        payload: &AddVideoPayload,
        author_id: DbId,
    ) -> Result<VideoListRow, PipelineError> {
        let video = VideoRepo::create(
            &self.pool,
            &CreateVideo {
                uuid,
                remote_uuid: Some(payload.remote_id),
                name: payload.name.clone(),
                description: payload.description.clone(),
                extname: payload.extname.clone(),
                info_hash: payload.info_hash.clone(),
                duration: payload.duration,
                author_id,
            },
        )
        .await?;
        TagRepo::set_for_video(&self.pool, video.id, &payload.tags).await?;

        VideoRepo::find_list_row(&self.pool, uuid)
            .await?
            .ok_or_else(|| {
                PipelineError::Core(CoreError::NotFound {
                    entity: "video",
                    id: uuid.to_string(),
                })
            })
    }

    /// Send every owned video to one pod so the two directories
    /// converge without waiting for future uploads. Best-effort like
    /// all federation work; a video whose thumbnail cannot be read is
    /// skipped with a warning.
    async fn announce_catalogue_to(&self, host: &str) {
        let rows = match VideoRepo::list_owned_rows(&self.pool).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(pod = host, error = %e, "Could not load owned catalogue");
                return;
            }
        };
        tracing::info!(pod = host, videos = rows.len(), "Announcing catalogue to new pod");
        for row in &rows {
            let thumbnail_path = self
                .config
                .storage
                .thumbnails_dir
                .join(identity::thumbnail_file_name(row.uuid));
            let thumbnail = match tokio::fs::read(&thumbnail_path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(video = %row.uuid, error = %e, "Thumbnail unreadable; skipping");
                    continue;
                }
            };
            match AddVideoPayload::from_owned(row, &self.local_host(), &thumbnail) {
                Ok(payload) => self.queue.publish(FederationEvent::AddVideo {
                    to_host: Some(host.to_string()),
                    payload,
                }),
                Err(e) => {
                    tracing::warn!(video = %row.uuid, error = %e, "Video not exportable");
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Updates
    // -----------------------------------------------------------------------

    /// Apply a local metadata update. Owned videos have the change
    /// propagated to all known pods; updating a mirrored video only
    /// changes the local copy.
    pub async fn update(
        &self,
        uuid: Uuid,
        input: UpdateVideo,
        tags: Option<Vec<String>>,
    ) -> Result<VideoListRow, PipelineError> {
        if let Some(name) = input.name.as_deref() {
            video_rules::validate_name(name)?;
        }
        if input.description.is_some() {
            video_rules::validate_description(input.description.as_deref())?;
        }
        if let Some(tags) = tags.as_deref() {
            video_rules::validate_tags(tags)?;
        }

        let video = VideoRepo::find_by_uuid(&self.pool, uuid)
            .await?
            .ok_or_else(|| {
                PipelineError::Core(CoreError::NotFound {
                    entity: "video",
                    id: uuid.to_string(),
                })
            })?;

        VideoRepo::update_metadata(&self.pool, video.id, &input).await?;
        if let Some(tags) = &tags {
            TagRepo::set_for_video(&self.pool, video.id, tags).await?;
        }

        let row = VideoRepo::find_list_row(&self.pool, uuid)
            .await?
            .ok_or_else(|| {
                PipelineError::Core(CoreError::NotFound {
                    entity: "video",
                    id: uuid.to_string(),
                })
            })?;

        if row.is_owned() {
            match UpdateVideoPayload::from_owned(&row, &self.local_host()) {
                Ok(payload) => self.queue.publish(FederationEvent::UpdateVideo(payload)),
                Err(e) => {
                    tracing::warn!(video = %uuid, error = %e, "Video not exportable");
                }
            }
        }
        Ok(row)
    }

    /// Apply an update announced by the owning peer to our mirror.
    /// Unknown videos are ignored: the peer may have announced before
    /// we joined, or our mirror may already be gone.
    pub async fn apply_remote_update(
        &self,
        payload: UpdateVideoPayload,
    ) -> Result<(), PipelineError> {
        let Some(video) =
            VideoRepo::find_by_remote_uuid(&self.pool, payload.remote_id, &payload.pod_host)
                .await?
        else {
            tracing::debug!(
                remote_id = %payload.remote_id,
                pod = %payload.pod_host,
                "Update for unknown mirror; ignoring"
            );
            return Ok(());
        };

        video_rules::validate_name(&payload.name)?;
        video_rules::validate_description(payload.description.as_deref())?;
        video_rules::validate_tags(&payload.tags)?;

        VideoRepo::update_metadata(
            &self.pool,
            video.id,
            &UpdateVideo {
                name: Some(payload.name.clone()),
                description: payload.description.clone(),
            },
        )
        .await?;
        TagRepo::set_for_video(&self.pool, video.id, &payload.tags).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Destruction
    // -----------------------------------------------------------------------

    /// Destroy a video: delete the row, remove its on-disk artifacts,
    /// and (for owned videos) broadcast the removal.
    ///
    /// Artifact removal is best-effort; failures are collected in the
    /// returned report and logged but never abort the destruction.
    pub async fn destroy(&self, uuid: Uuid) -> Result<CleanupReport, PipelineError> {
        let row = VideoRepo::find_list_row(&self.pool, uuid)
            .await?
            .ok_or_else(|| {
                PipelineError::Core(CoreError::NotFound {
                    entity: "video",
                    id: uuid.to_string(),
                })
            })?;

        let removal = if row.is_owned() {
            RemoveVideoPayload::from_owned(&row, &self.local_host()).ok()
        } else {
            None
        };

        VideoRepo::delete(&self.pool, row.id).await?;

        let report = self.remove_artifacts(&row).await;
        for failure in &report.failures {
            tracing::warn!(
                video = %uuid,
                artifact = failure.artifact,
                error = %failure.error,
                "Failed to remove artifact"
            );
        }

        if let Some(payload) = removal {
            self.queue.publish(FederationEvent::RemoveVideo(payload));
        }
        Ok(report)
    }

    /// Destroy our mirror of a video the owning peer removed. Unknown
    /// videos are ignored.
    pub async fn apply_remote_remove(
        &self,
        payload: RemoveVideoPayload,
    ) -> Result<(), PipelineError> {
        let Some(video) =
            VideoRepo::find_by_remote_uuid(&self.pool, payload.remote_id, &payload.pod_host)
                .await?
        else {
            tracing::debug!(
                remote_id = %payload.remote_id,
                pod = %payload.pod_host,
                "Removal for unknown mirror; ignoring"
            );
            return Ok(());
        };
        self.destroy(video.uuid).await?;
        Ok(())
    }

    async fn remove_artifacts(&self, row: &VideoListRow) -> CleanupReport {
        let targets = artifact_paths(row, &self.config);
        let results = join_all(
            targets
                .iter()
                .map(|(_, path)| tokio::fs::remove_file(path)),
        )
        .await;

        let mut failures = Vec::new();
        for ((artifact, _), result) in targets.into_iter().zip(results) {
            match result {
                Ok(()) => {}
                // A missing file is an acceptable end state for a removal.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => failures.push(CleanupFailure { artifact, error: e }),
            }
        }
        CleanupReport { failures }
    }
}

/// The on-disk artifacts a video owns, labelled for failure reporting.
///
/// Mirrored videos hold only a thumbnail; owned videos additionally
/// hold the raw media, torrent descriptor, and preview.
fn artifact_paths(row: &VideoListRow, config: &PodConfig) -> Vec<(&'static str, PathBuf)> {
    let mut paths = vec![(
        "thumbnail",
        config
            .storage
            .thumbnails_dir
            .join(identity::thumbnail_file_name(row.uuid)),
    )];
    if row.is_owned() {
        let ownership = Ownership::Owned;
        paths.push((
            "video",
            config
                .storage
                .videos_dir
                .join(identity::video_file_name(&ownership, row.uuid, &row.extname)),
        ));
        paths.push((
            "torrent",
            config
                .storage
                .torrents_dir
                .join(identity::torrent_file_name(&ownership, row.uuid)),
        ));
        paths.push((
            "preview",
            config
                .storage
                .previews_dir
                .join(identity::preview_file_name(&ownership, row.uuid)),
        ));
    }
    paths
}
