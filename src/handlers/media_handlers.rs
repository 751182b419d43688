//! HTTP handlers for media listing, retrieval, upload, and mutation.
//!
//! Read paths resolve the caller with [`OptionalAuthUser`] so a missing or
//! invalid token degrades to anonymous; mutation paths use [`AuthUser`]
//! and hard-fail with 401 before any ownership check runs.

use crate::{
    auth::extract::{AuthUser, OptionalAuthUser},
    config::ALLOWED_FILE_TYPES,
    errors::AppError,
    handlers::{ApiResponse, MediaDto, MediaSummaryDto, parse_id},
    models::media::Visibility,
    services::media_service::{
        self, LIST_LIMIT_DEFAULT, MediaChanges, NewMedia, VisibilityFilter,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListMediaQuery {
    pub visibility: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PaginationDto {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
}

#[derive(Debug, Serialize)]
pub struct MediaListData {
    pub media: Vec<MediaDto>,
    pub pagination: PaginationDto,
}

/// GET /api/media — list items visible to the caller.
pub async fn list_media(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Query(query): Query<ListMediaQuery>,
) -> Result<Json<ApiResponse<MediaListData>>, AppError> {
    let filter = VisibilityFilter::parse(query.visibility.as_deref());
    let page = state
        .media
        .list(
            caller,
            filter,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(LIST_LIMIT_DEFAULT),
        )
        .await?;

    Ok(Json(ApiResponse::ok(
        "Media retrieved successfully",
        MediaListData {
            media: page.items.into_iter().map(MediaDto::from).collect(),
            pagination: PaginationDto {
                total: page.total,
                page: page.page,
                limit: page.limit,
                pages: page.pages,
            },
        },
    )))
}

#[derive(Debug, Serialize)]
pub struct MediaItemData {
    pub media: MediaDto,
}

/// GET /api/media/{id} — single item, visibility-gated.
pub async fn get_media(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MediaItemData>>, AppError> {
    let id = parse_id(&id)?;
    let media = state.media.get(id, caller).await.map_err(|err| {
        match err {
            media_service::MediaError::NotOwner => {
                AppError::forbidden("Not authorized to view this media")
            }
            other => other.into(),
        }
    })?;

    Ok(Json(ApiResponse::ok(
        "Media retrieved successfully",
        MediaItemData {
            media: media.into(),
        },
    )))
}

#[derive(Debug, Serialize)]
pub struct MediaSummaryData {
    pub media: MediaSummaryDto,
}

struct UploadForm {
    title: Option<String>,
    description: Option<String>,
    visibility: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Option<Vec<u8>>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm {
        title: None,
        description: None,
        visibility: None,
        file_name: None,
        content_type: None,
        data: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request("Invalid multipart data"))?
    {
        match field.name() {
            Some("title") => {
                form.title = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| AppError::bad_request("Invalid multipart data"))?,
                );
            }
            Some("description") => {
                form.description = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| AppError::bad_request("Invalid multipart data"))?,
                );
            }
            Some("visibility") => {
                form.visibility = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| AppError::bad_request("Invalid multipart data"))?,
                );
            }
            Some("file") => {
                form.file_name = field.file_name().map(|s| s.to_string());
                form.content_type = field.content_type().map(|s| s.to_string());
                form.data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|_| AppError::bad_request("Invalid multipart data"))?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Storage key for a new upload: `{owner}/{millis}-{random}{ext}`, with the
/// extension carried over from the submitted filename.
fn build_file_key(owner: Uuid, file_name: Option<&str>) -> String {
    let ext = file_name
        .and_then(|name| std::path::Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    format!(
        "{}/{}-{}{}",
        owner,
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        ext
    )
}

/// POST /api/media — authenticated multipart upload.
pub async fn upload_media(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MediaSummaryData>>), AppError> {
    let form = read_upload_form(multipart).await?;

    let data = form
        .data
        .ok_or_else(|| AppError::bad_request("Please upload a file"))?;
    let content_type = form
        .content_type
        .ok_or_else(|| AppError::bad_request("Please upload a file"))?;

    if !ALLOWED_FILE_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::bad_request(format!(
            "File type not supported. Allowed types: {}",
            ALLOWED_FILE_TYPES.join(", ")
        )));
    }
    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::bad_request("File exceeds the maximum upload size"));
    }

    let title = media_service::validate_title(form.title.as_deref().unwrap_or_default())?;
    let description = form
        .description
        .as_deref()
        .map(media_service::validate_description)
        .transpose()?;
    let visibility = match form.visibility.as_deref() {
        Some(raw) => media_service::parse_visibility(raw)?,
        None => Visibility::Private,
    };

    let key = build_file_key(user.id, form.file_name.as_deref());
    state.storage.put_object(&key, &data).await?;

    let created = state
        .media
        .create(NewMedia {
            title,
            description,
            file_url: state.config.file_url(&key),
            file_key: key.clone(),
            file_type: content_type,
            size_bytes: data.len() as i64,
            owner_id: user.id,
            visibility,
        })
        .await;

    let media = match created {
        Ok(media) => media,
        Err(err) => {
            // metadata insert failed; don't leave an orphaned payload
            if let Err(cleanup) = state.storage.delete_object(&key).await {
                tracing::warn!("failed to clean up payload {}: {}", key, cleanup);
            }
            return Err(err.into());
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Media uploaded successfully",
            MediaSummaryData {
                media: media.into(),
            },
        )),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateMediaRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<String>,
}

/// PATCH /api/media/{id} — owner-only metadata update.
pub async fn update_media(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateMediaRequest>,
) -> Result<Json<ApiResponse<MediaSummaryData>>, AppError> {
    let id = parse_id(&id)?;

    let changes = MediaChanges {
        title: req
            .title
            .as_deref()
            .map(media_service::validate_title)
            .transpose()?,
        description: req
            .description
            .as_deref()
            .map(media_service::validate_description)
            .transpose()?,
        visibility: req
            .visibility
            .as_deref()
            .map(media_service::parse_visibility)
            .transpose()?,
    };

    let media = state
        .media
        .update(id, user.id, changes)
        .await
        .map_err(|err| match err {
            media_service::MediaError::NotOwner => {
                AppError::forbidden("Not authorized to update this media")
            }
            other => other.into(),
        })?;

    Ok(Json(ApiResponse::ok(
        "Media updated successfully",
        MediaSummaryData {
            media: media.into(),
        },
    )))
}

/// DELETE /api/media/{id} — owner-only removal.
///
/// The metadata row is removed first; payload removal is best-effort and a
/// failure there is logged, never surfaced.
pub async fn delete_media(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = parse_id(&id)?;

    let media = state
        .media
        .delete(id, user.id)
        .await
        .map_err(|err| match err {
            media_service::MediaError::NotOwner => {
                AppError::forbidden("Not authorized to delete this media")
            }
            other => other.into(),
        })?;

    if let Err(err) = state.storage.delete_object(&media.file_key).await {
        tracing::warn!("failed to delete payload {}: {}", media.file_key, err);
    }

    Ok(Json(ApiResponse::message("Media deleted successfully")))
}
