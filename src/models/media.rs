//! Represents an uploaded media item (image, video, or PDF).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-item read-access flag. `Private` items are visible only to their
/// owner; `Public` items are visible to anyone, including anonymous callers.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// A single media item. The struct stores metadata, not the payload bytes;
/// those live in the storage service under `file_key`.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Media {
    pub id: Uuid,

    pub title: String,

    pub description: Option<String>,

    /// Public download URL for the stored payload.
    pub file_url: String,

    /// Storage key addressing the payload on disk.
    pub file_key: String,

    /// Content type (MIME type) recorded at upload time.
    pub file_type: String,

    pub size_bytes: i64,

    /// Owning user. Set at creation, never changed.
    pub owner_id: Uuid,

    pub visibility: Visibility,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// A media row joined with the owner's public display fields, as returned
/// by list and single-item queries.
#[derive(Clone, FromRow, Debug)]
pub struct MediaWithOwner {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_key: String,
    pub file_type: String,
    pub size_bytes: i64,
    pub owner_id: Uuid,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_email: String,
    pub owner_display_name: Option<String>,
    pub owner_avatar_url: Option<String>,
}
