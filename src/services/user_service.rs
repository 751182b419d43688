//! UserService — account lookup and creation from verified identities.

use crate::{auth::identity::VerifiedIdentity, models::user::{Role, User}};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

const SELECT_USER: &str = "SELECT id, email, google_id, first_name, last_name, display_name, \
     avatar_url, role, created_at, updated_at FROM users";

#[derive(Clone)]
pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.db)
            .await
    }

    /// Map a verified Google identity onto a user record.
    ///
    /// No user with that email: create one with role `user`. A user with
    /// that email but no linked Google id: backfill the id, and the avatar
    /// only when the assertion carries one. A user already linked: returned
    /// as-is; the stored id and role are never rewritten here.
    pub async fn resolve_identity(&self, identity: &VerifiedIdentity) -> Result<User, sqlx::Error> {
        match self.find_by_email(&identity.email).await? {
            None => {
                let now = Utc::now();
                sqlx::query_as::<_, User>(
                    "INSERT INTO users (id, email, google_id, first_name, last_name, \
                     display_name, avatar_url, role, created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
                     RETURNING id, email, google_id, first_name, last_name, display_name, \
                     avatar_url, role, created_at, updated_at",
                )
                .bind(Uuid::new_v4())
                .bind(&identity.email)
                .bind(&identity.subject)
                .bind(&identity.given_name)
                .bind(&identity.family_name)
                .bind(&identity.name)
                .bind(&identity.picture)
                .bind(Role::User)
                .bind(now)
                .bind(now)
                .fetch_one(&self.db)
                .await
            }
            Some(user) if user.google_id.is_none() => {
                sqlx::query_as::<_, User>(
                    "UPDATE users SET google_id = ?, \
                     avatar_url = COALESCE(?, avatar_url), updated_at = ? \
                     WHERE id = ? \
                     RETURNING id, email, google_id, first_name, last_name, display_name, \
                     avatar_url, role, created_at, updated_at",
                )
                .bind(&identity.subject)
                .bind(&identity.picture)
                .bind(Utc::now())
                .bind(user.id)
                .fetch_one(&self.db)
                .await
            }
            Some(user) => Ok(user),
        }
    }
}
