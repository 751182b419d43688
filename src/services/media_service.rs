//! MediaService — media metadata CRUD and the visibility decision table.
//!
//! Every read is scoped by the caller identity (possibly anonymous) and the
//! per-item visibility flag; every write requires the caller to be the
//! stored owner. The rules live in [`list_scope`] and the ownership checks
//! below so handlers stay thin.

use crate::models::media::{Media, MediaWithOwner, Visibility};
use chrono::Utc;
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};
use thiserror::Error;
use uuid::Uuid;

const TITLE_MIN_LEN: usize = 3;
const TITLE_MAX_LEN: usize = 100;
const DESCRIPTION_MAX_LEN: usize = 500;
pub const LIST_LIMIT_MAX: u32 = 50;
pub const LIST_LIMIT_DEFAULT: u32 = 10;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media item `{0}` not found")]
    NotFound(Uuid),
    #[error("caller does not own this media item")]
    NotOwner,
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type MediaResult<T> = Result<T, MediaError>;

/// Requested listing filter, parsed from the `visibility` query parameter.
/// Unrecognized values fall back to `Public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityFilter {
    Public,
    Private,
    All,
}

impl VisibilityFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("private") => VisibilityFilter::Private,
            Some("all") => VisibilityFilter::All,
            _ => VisibilityFilter::Public,
        }
    }
}

/// The effective query scope for a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Only `public` items.
    PublicOnly,
    /// Only the caller's own `private` items.
    OwnPrivate(Uuid),
    /// All `public` items plus the caller's own `private` items.
    PublicOrOwn(Uuid),
}

/// The one nontrivial decision table in the system: without a caller
/// identity every filter collapses to public-only; with one, `private`
/// narrows to the caller's own private items and `all` widens to the union.
/// Other users' private items are never in scope.
pub fn list_scope(caller: Option<Uuid>, filter: VisibilityFilter) -> ListScope {
    match (caller, filter) {
        (Some(uid), VisibilityFilter::Private) => ListScope::OwnPrivate(uid),
        (Some(uid), VisibilityFilter::All) => ListScope::PublicOrOwn(uid),
        _ => ListScope::PublicOnly,
    }
}

fn push_scope(builder: &mut QueryBuilder<'_, Sqlite>, scope: ListScope) {
    match scope {
        ListScope::PublicOnly => {
            builder.push(" WHERE m.visibility = 'public'");
        }
        ListScope::OwnPrivate(uid) => {
            builder.push(" WHERE m.visibility = 'private' AND m.owner_id = ");
            builder.push_bind(uid);
        }
        ListScope::PublicOrOwn(uid) => {
            builder.push(
                " WHERE (m.visibility = 'public' OR (m.visibility = 'private' AND m.owner_id = ",
            );
            builder.push_bind(uid);
            builder.push("))");
        }
    }
}

const SELECT_WITH_OWNER: &str = "SELECT m.id, m.title, m.description, m.file_url, m.file_key, \
     m.file_type, m.size_bytes, m.owner_id, m.visibility, m.created_at, m.updated_at, \
     u.email AS owner_email, u.display_name AS owner_display_name, \
     u.avatar_url AS owner_avatar_url \
     FROM media m JOIN users u ON u.id = m.owner_id";

/// Fields for a new media item; the storage service has already accepted
/// the payload under `file_key` by the time this is inserted.
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_key: String,
    pub file_type: String,
    pub size_bytes: i64,
    pub owner_id: Uuid,
    pub visibility: Visibility,
}

/// Owner-supplied changes; absent fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct MediaChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
}

/// Total page count for a listing: ceiling of `total / limit`.
fn page_count(total: i64, limit: u32) -> u32 {
    let limit = limit.max(1) as i64;
    ((total + limit - 1) / limit) as u32
}

#[derive(Debug)]
pub struct MediaPage {
    pub items: Vec<MediaWithOwner>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
}

/// Validate a title per the upload rules (3-100 characters, trimmed).
pub fn validate_title(title: &str) -> MediaResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(MediaError::Invalid("Title is required".into()));
    }
    if trimmed.len() < TITLE_MIN_LEN || trimmed.len() > TITLE_MAX_LEN {
        return Err(MediaError::Invalid(
            "Title must be between 3 and 100 characters".into(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate an optional description (500 characters max, trimmed).
pub fn validate_description(description: &str) -> MediaResult<String> {
    let trimmed = description.trim();
    if trimmed.len() > DESCRIPTION_MAX_LEN {
        return Err(MediaError::Invalid(
            "Description cannot exceed 500 characters".into(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Parse a visibility string from a request body.
pub fn parse_visibility(raw: &str) -> MediaResult<Visibility> {
    match raw {
        "public" => Ok(Visibility::Public),
        "private" => Ok(Visibility::Private),
        _ => Err(MediaError::Invalid(
            "Visibility must be either public or private".into(),
        )),
    }
}

#[derive(Clone)]
pub struct MediaService {
    db: SqlitePool,
}

impl MediaService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List media visible to `caller` under `filter`, newest first.
    pub async fn list(
        &self,
        caller: Option<Uuid>,
        filter: VisibilityFilter,
        page: u32,
        limit: u32,
    ) -> MediaResult<MediaPage> {
        let scope = list_scope(caller, filter);
        let page = page.max(1);
        let limit = limit.clamp(1, LIST_LIMIT_MAX);
        let offset = (page as i64 - 1) * limit as i64;

        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_WITH_OWNER);
        push_scope(&mut builder, scope);
        builder.push(" ORDER BY m.created_at DESC LIMIT ");
        builder.push_bind(limit as i64);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let items: Vec<MediaWithOwner> = builder.build_query_as().fetch_all(&self.db).await?;

        let mut count_builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM media m");
        push_scope(&mut count_builder, scope);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.db)
            .await?;

        let pages = page_count(total, limit);

        Ok(MediaPage {
            items,
            total,
            page,
            limit,
            pages,
        })
    }

    /// Fetch a single item, enforcing visibility.
    ///
    /// Unknown id is `NotFound`; a `private` item whose owner is not the
    /// resolved caller (including the anonymous case) is `NotOwner`.
    pub async fn get(&self, id: Uuid, caller: Option<Uuid>) -> MediaResult<MediaWithOwner> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_WITH_OWNER);
        builder.push(" WHERE m.id = ");
        builder.push_bind(id);

        let media: MediaWithOwner = builder
            .build_query_as()
            .fetch_optional(&self.db)
            .await?
            .ok_or(MediaError::NotFound(id))?;

        if media.visibility == Visibility::Private && caller != Some(media.owner_id) {
            return Err(MediaError::NotOwner);
        }

        Ok(media)
    }

    /// Insert metadata for a freshly stored upload.
    pub async fn create(&self, new: NewMedia) -> MediaResult<Media> {
        let now = Utc::now();
        let media = sqlx::query_as::<_, Media>(
            "INSERT INTO media (id, title, description, file_url, file_key, file_type, \
             size_bytes, owner_id, visibility, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING id, title, description, file_url, file_key, file_type, size_bytes, \
             owner_id, visibility, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.file_url)
        .bind(&new.file_key)
        .bind(&new.file_type)
        .bind(new.size_bytes)
        .bind(new.owner_id)
        .bind(new.visibility)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await?;

        Ok(media)
    }

    /// Apply owner-supplied changes. Ownership is checked against the
    /// stored owner regardless of visibility.
    pub async fn update(
        &self,
        id: Uuid,
        caller: Uuid,
        changes: MediaChanges,
    ) -> MediaResult<Media> {
        let current = self.fetch_owned(id, caller).await?;

        let title = changes.title.unwrap_or(current.title);
        let description = changes.description.or(current.description);
        let visibility = changes.visibility.unwrap_or(current.visibility);

        let media = sqlx::query_as::<_, Media>(
            "UPDATE media SET title = ?, description = ?, visibility = ?, updated_at = ? \
             WHERE id = ? \
             RETURNING id, title, description, file_url, file_key, file_type, size_bytes, \
             owner_id, visibility, created_at, updated_at",
        )
        .bind(&title)
        .bind(&description)
        .bind(visibility)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(media)
    }

    /// Delete the metadata row, returning the removed item so the caller
    /// can attempt payload removal with its storage key.
    pub async fn delete(&self, id: Uuid, caller: Uuid) -> MediaResult<Media> {
        let media = self.fetch_owned(id, caller).await?;

        sqlx::query("DELETE FROM media WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(media)
    }

    /// All media owned by `owner`, optionally restricted to public items,
    /// newest first.
    pub async fn list_by_owner(
        &self,
        owner: Uuid,
        public_only: bool,
    ) -> MediaResult<Vec<MediaWithOwner>> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_WITH_OWNER);
        builder.push(" WHERE m.owner_id = ");
        builder.push_bind(owner);
        if public_only {
            builder.push(" AND m.visibility = 'public'");
        }
        builder.push(" ORDER BY m.created_at DESC");

        let items = builder.build_query_as().fetch_all(&self.db).await?;
        Ok(items)
    }

    /// Look up an item by its storage key (used when serving payloads).
    pub async fn find_by_key(&self, key: &str) -> MediaResult<Option<Media>> {
        let media = sqlx::query_as::<_, Media>(
            "SELECT id, title, description, file_url, file_key, file_type, size_bytes, \
             owner_id, visibility, created_at, updated_at \
             FROM media WHERE file_key = ?",
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await?;

        Ok(media)
    }

    async fn fetch_owned(&self, id: Uuid, caller: Uuid) -> MediaResult<Media> {
        let media = sqlx::query_as::<_, Media>(
            "SELECT id, title, description, file_url, file_key, file_type, size_bytes, \
             owner_id, visibility, created_at, updated_at \
             FROM media WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(MediaError::NotFound(id))?;

        if media.owner_id != caller {
            return Err(MediaError::NotOwner);
        }

        Ok(media)
    }
}
