//! User profile endpoints: own profile, own media, and the public view.

mod common;

use axum::http::StatusCode;
use common::{listed_titles, seed_media, seed_user, spawn_app, token_for};
use media_share::models::media::Visibility;
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
async fn profile_requires_auth_and_returns_full_record() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;

    let res = app.server.get("/api/users/profile").await;
    res.assert_status(StatusCode::UNAUTHORIZED);

    let res = app
        .server
        .get("/api/users/profile")
        .authorization_bearer(&token_for(&app, &alice))
        .await;
    res.assert_status(StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["data"]["user"]["email"], json!("alice@example.com"));
    assert_eq!(
        body["data"]["user"]["displayName"],
        json!("User alice@example.com")
    );
}

#[tokio::test]
async fn own_media_includes_private_items() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    let bob = seed_user(&app, "bob@example.com").await;
    seed_media(&app, &alice, "alice public", Visibility::Public).await;
    seed_media(&app, &alice, "alice private", Visibility::Private).await;
    seed_media(&app, &bob, "bob public", Visibility::Public).await;

    let res = app
        .server
        .get("/api/users/media")
        .authorization_bearer(&token_for(&app, &alice))
        .await;
    res.assert_status(StatusCode::OK);

    let mut titles = listed_titles(&res.json());
    titles.sort();
    assert_eq!(titles, vec!["alice private", "alice public"]);
}

#[tokio::test]
async fn public_profile_shows_only_public_media_and_no_email() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    seed_media(&app, &alice, "alice public", Visibility::Public).await;
    seed_media(&app, &alice, "alice private", Visibility::Private).await;

    let res = app.server.get(&format!("/api/users/{}", alice.id)).await;
    res.assert_status(StatusCode::OK);
    let body: Value = res.json();

    assert_eq!(listed_titles(&body), vec!["alice public"]);
    assert_eq!(
        body["data"]["user"]["displayName"],
        json!("User alice@example.com")
    );
    assert!(body["data"]["user"].get("email").is_none());
}

#[tokio::test]
async fn public_profile_for_unknown_or_malformed_id() {
    let app = spawn_app().await;

    let res = app.server.get(&format!("/api/users/{}", Uuid::new_v4())).await;
    res.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>()["message"], json!("User not found"));

    let res = app.server.get("/api/users/not-an-id").await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["message"], json!("Invalid ID format"));
}
