//! User profile endpoints.

use crate::{
    auth::extract::AuthUser,
    errors::AppError,
    handlers::{ApiResponse, MediaDto, UserDto, parse_id},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub user: UserDto,
}

/// GET /api/users/profile — the caller's own record.
pub async fn user_profile(AuthUser(user): AuthUser) -> Json<ApiResponse<ProfileData>> {
    Json(ApiResponse::ok(
        "User profile retrieved successfully",
        ProfileData { user: user.into() },
    ))
}

#[derive(Debug, Serialize)]
pub struct UserMediaData {
    pub media: Vec<MediaDto>,
}

/// GET /api/users/media — everything the caller owns, newest first.
pub async fn user_media(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<UserMediaData>>, AppError> {
    let items = state.media.list_by_owner(user.id, false).await?;

    Ok(Json(ApiResponse::ok(
        "User media retrieved successfully",
        UserMediaData {
            media: items.into_iter().map(MediaDto::from).collect(),
        },
    )))
}

/// Display fields exposed on a public profile; email stays private here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileDto {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublicProfileData {
    pub user: PublicProfileDto,
    pub media: Vec<MediaDto>,
}

/// GET /api/users/{id} — public profile: display info plus public media only.
pub async fn public_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PublicProfileData>>, AppError> {
    let id = parse_id(&id)?;

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let items = state.media.list_by_owner(id, true).await?;

    Ok(Json(ApiResponse::ok(
        "User profile retrieved successfully",
        PublicProfileData {
            user: PublicProfileDto {
                id: user.id,
                display_name: user.display_name,
                avatar_url: user.avatar_url,
            },
            media: items.into_iter().map(MediaDto::from).collect(),
        },
    )))
}
