//! HTTP handlers and the response envelope shared across them.
//!
//! All endpoints reply with `{success, message, data?}` and camelCase
//! field names, the wire shape the frontend already consumes.

pub mod auth_handlers;
pub mod file_handlers;
pub mod health_handlers;
pub mod media_handlers;
pub mod user_handlers;

use crate::{
    errors::AppError,
    models::{
        media::{Media, MediaWithOwner, Visibility},
        user::{Role, User},
    },
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success with no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Parse a path id, mapping failure to the validation error the original
/// API used for malformed ids.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse()
        .map_err(|_| AppError::bad_request("Invalid ID format"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            role: user.role,
        }
    }
}

/// Owner display fields embedded in media responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDto {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub email: String,
}

/// A media item with its owner, as returned by list and single-item reads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_type: String,
    pub size: i64,
    pub visibility: Visibility,
    pub owner: OwnerDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MediaWithOwner> for MediaDto {
    fn from(media: MediaWithOwner) -> Self {
        Self {
            id: media.id,
            title: media.title,
            description: media.description,
            file_url: media.file_url,
            file_type: media.file_type,
            size: media.size_bytes,
            visibility: media.visibility,
            owner: OwnerDto {
                id: media.owner_id,
                display_name: media.owner_display_name,
                avatar_url: media.owner_avatar_url,
                email: media.owner_email,
            },
            created_at: media.created_at,
            updated_at: media.updated_at,
        }
    }
}

/// A media item without owner details, as returned by create and update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSummaryDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_type: String,
    pub size: i64,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Media> for MediaSummaryDto {
    fn from(media: Media) -> Self {
        Self {
            id: media.id,
            title: media.title,
            description: media.description,
            file_url: media.file_url,
            file_type: media.file_type,
            size: media.size_bytes,
            visibility: media.visibility,
            created_at: media.created_at,
            updated_at: media.updated_at,
        }
    }
}
