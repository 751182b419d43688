//! Shared fixture for the web API tests: an in-memory SQLite database, a
//! scratch storage directory, and helpers to seed users and media directly
//! through the services.

#![allow(dead_code)]

use axum_test::TestServer;
use media_share::{
    auth::identity::VerifiedIdentity,
    config::AppConfig,
    db,
    models::{media::Media, media::Visibility, user::User},
    routes,
    services::media_service::NewMedia,
    state::AppState,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use uuid::Uuid;

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    _storage_dir: tempfile::TempDir,
}

pub async fn spawn_app() -> TestApp {
    let storage_dir = tempfile::tempdir().unwrap();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::migrate(&pool).await.unwrap();

    let cfg = AppConfig {
        storage_dir: storage_dir.path().display().to_string(),
        ..AppConfig::default()
    };
    let state = AppState::new(Arc::new(cfg), pool);
    let server = TestServer::new(routes::router(state.clone())).unwrap();

    TestApp {
        server,
        state,
        _storage_dir: storage_dir,
    }
}

pub async fn seed_user(app: &TestApp, email: &str) -> User {
    let identity = VerifiedIdentity {
        subject: format!("google-{}", email),
        email: email.into(),
        name: Some(format!("User {}", email)),
        given_name: None,
        family_name: None,
        picture: None,
    };
    app.state.users.resolve_identity(&identity).await.unwrap()
}

pub fn token_for(app: &TestApp, user: &User) -> String {
    app.state.tokens.sign(user.id).unwrap()
}

pub const PAYLOAD: &[u8] = b"test-bytes";

pub async fn seed_media(
    app: &TestApp,
    owner: &User,
    title: &str,
    visibility: Visibility,
) -> Media {
    let key = format!("{}/{}.png", owner.id, Uuid::new_v4().simple());
    app.state.storage.put_object(&key, PAYLOAD).await.unwrap();

    app.state
        .media
        .create(NewMedia {
            title: title.into(),
            description: None,
            file_url: app.state.config.file_url(&key),
            file_key: key,
            file_type: "image/png".into(),
            size_bytes: PAYLOAD.len() as i64,
            owner_id: owner.id,
            visibility,
        })
        .await
        .unwrap()
}

/// Titles of the items in a list response, in returned order.
pub fn listed_titles(body: &serde_json::Value) -> Vec<String> {
    body["data"]["media"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect()
}
