//! Represents an account created from a verified Google identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account role. Ordinary accounts are `User`; `Admin` exists for
/// operations restricted via [`crate::auth::permission`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// A registered user.
///
/// Created on first successful Google verification; the `google_id` link is
/// backfilled when a matching email already exists without one. Never
/// deleted by this service.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct User {
    /// Unique identifier (UUID for internal DB use).
    pub id: Uuid,

    /// Email address, unique across accounts.
    pub email: String,

    /// Linked Google subject id, if the account has ever verified one.
    pub google_id: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    /// Name shown next to media items.
    pub display_name: Option<String>,

    /// Avatar image URL from the identity provider.
    pub avatar_url: Option<String>,

    pub role: Role,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}
