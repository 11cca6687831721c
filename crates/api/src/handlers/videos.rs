//! Handlers for the video catalogue: multipart upload, listing,
//! search dispatch, metadata updates, and destruction.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use vidpod_core::search::{clamp_limit, clamp_offset, SearchField, Sort};
use vidpod_db::models::video::UpdateVideo;
use vidpod_db::repositories::VideoRepo;
use vidpod_pipeline::{NewOwnedVideo, PublicVideo};

use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

// ── Upload ───────────────────────────────────────────────────────────

/// POST /api/v1/videos
///
/// Accept a multipart upload: text fields `name`, `description`
/// (optional) and `tags` (repeatable), plus the media under
/// `videofile`. Returns 201 with the public representation once every
/// artifact has been generated.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<PublicVideo>>)> {
    let mut name = None;
    let mut description = None;
    let mut author = None;
    let mut tags = Vec::new();
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name().unwrap_or_default() {
            "name" => name = Some(read_text(field).await?),
            "description" => description = Some(read_text(field).await?),
            "author" => author = Some(read_text(field).await?),
            "tags" => tags.push(read_text(field).await?),
            "videofile" => {
                let filename = field
                    .file_name()
                    .ok_or_else(|| AppError::BadRequest("videofile has no file name".into()))?
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((filename, bytes.to_vec()));
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let name = name.ok_or_else(|| AppError::BadRequest("Missing field 'name'".into()))?;
    let author = author.ok_or_else(|| AppError::BadRequest("Missing field 'author'".into()))?;
    let (filename, bytes) =
        file.ok_or_else(|| AppError::BadRequest("Missing field 'videofile'".into()))?;

    let meta = NewOwnedVideo {
        name,
        description,
        author,
        tags,
        extname: extension_of(&filename)?,
    };

    let row = state.lifecycle.create_owned(meta, &bytes).await?;
    let video = PublicVideo::from_row(&row, &state.config.pod)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: video })))
}

/// Read a multipart text field.
async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Extract the dotted extension from an uploaded file name.
fn extension_of(filename: &str) -> AppResult<String> {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| {
            AppError::BadRequest(format!("File name '{filename}' has no extension"))
        })?;
    Ok(format!(".{}", ext.to_lowercase()))
}

// ── Listing and search ───────────────────────────────────────────────

/// GET /api/v1/videos
///
/// Paginated listing of the whole catalogue, local and mirrored alike.
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ListResponse<PublicVideo>>> {
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);
    let sort = Sort::parse(params.sort.as_deref());

    let rows = VideoRepo::list(&state.pool, offset, limit, &sort).await?;
    let total = VideoRepo::count(&state.pool).await?;

    let data = rows
        .iter()
        .map(|row| PublicVideo::from_row(row, &state.config.pod))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ListResponse { data, total }))
}

/// Query parameters for the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Field to search in; defaults to a name substring match.
    pub field: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<String>,
}

/// GET /api/v1/videos/search/{value}
///
/// Single-field search. `?field=` selects the dimension (`name`,
/// `author`, `host`, `tags`, `magnetUri`); anything else degrades to a
/// substring match on a whitelisted column.
pub async fn search_videos(
    State(state): State<AppState>,
    Path(value): Path<String>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ListResponse<PublicVideo>>> {
    let field = SearchField::parse(params.field.as_deref().unwrap_or("name"));
    let predicate = field.predicate(&value)?;

    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);
    let sort = Sort::parse(params.sort.as_deref());

    let rows = VideoRepo::search(&state.pool, &predicate, offset, limit, &sort).await?;
    let total = VideoRepo::search_count(&state.pool, &predicate).await?;

    let data = rows
        .iter()
        .map(|row| PublicVideo::from_row(row, &state.config.pod))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ListResponse { data, total }))
}

// ── Single video ─────────────────────────────────────────────────────

/// GET /api/v1/videos/{uuid}
pub async fn get_video(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> AppResult<Json<DataResponse<PublicVideo>>> {
    let row = VideoRepo::find_list_row(&state.pool, uuid)
        .await?
        .ok_or_else(|| {
            AppError::Core(vidpod_core::error::CoreError::NotFound {
                entity: "video",
                id: uuid.to_string(),
            })
        })?;
    let video = PublicVideo::from_row(&row, &state.config.pod)?;
    Ok(Json(DataResponse { data: video }))
}

/// Request body for metadata updates.
#[derive(Debug, Deserialize)]
pub struct UpdateVideoRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// PUT /api/v1/videos/{uuid}
///
/// Update name, description, and tags. Changes to owned videos are
/// propagated to peers.
pub async fn update_video(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
    Json(body): Json<UpdateVideoRequest>,
) -> AppResult<Json<DataResponse<PublicVideo>>> {
    let row = state
        .lifecycle
        .update(
            uuid,
            UpdateVideo {
                name: body.name,
                description: body.description,
            },
            body.tags,
        )
        .await?;
    let video = PublicVideo::from_row(&row, &state.config.pod)?;
    Ok(Json(DataResponse { data: video }))
}

/// DELETE /api/v1/videos/{uuid}
///
/// Destroy a video. Artifact removal failures are logged server-side
/// and do not fail the request; the row is gone either way.
pub async fn destroy_video(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.lifecycle.destroy(uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_and_dotted() {
        assert_eq!(extension_of("Holiday.MP4").unwrap(), ".mp4");
        assert_eq!(extension_of("clip.webm").unwrap(), ".webm");
    }

    #[test]
    fn missing_extension_is_rejected() {
        assert!(extension_of("noext").is_err());
    }
}
