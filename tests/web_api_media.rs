//! End-to-end coverage for the media endpoints: visibility scoping on
//! reads, ownership on mutations, and the multipart upload path.

mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use common::{PAYLOAD, listed_titles, seed_media, seed_user, spawn_app, token_for};
use media_share::models::media::Visibility;
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
async fn anonymous_list_returns_only_public_items() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    let bob = seed_user(&app, "bob@example.com").await;
    seed_media(&app, &alice, "alice private", Visibility::Private).await;
    seed_media(&app, &bob, "bob public", Visibility::Public).await;

    let res = app.server.get("/api/media").await;
    res.assert_status(StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(listed_titles(&body), vec!["bob public"]);
    assert_eq!(body["data"]["pagination"]["total"], json!(1));
}

#[tokio::test]
async fn anonymous_visibility_filters_still_scope_to_public() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    seed_media(&app, &alice, "hidden", Visibility::Private).await;
    seed_media(&app, &alice, "shown", Visibility::Public).await;

    for filter in ["all", "private"] {
        let res = app
            .server
            .get("/api/media")
            .add_query_param("visibility", filter)
            .await;
        res.assert_status(StatusCode::OK);
        assert_eq!(listed_titles(&res.json()), vec!["shown"], "filter={filter}");
    }
}

#[tokio::test]
async fn invalid_token_degrades_list_to_anonymous() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    seed_media(&app, &alice, "hidden", Visibility::Private).await;
    seed_media(&app, &alice, "shown", Visibility::Public).await;

    let res = app
        .server
        .get("/api/media")
        .add_query_param("visibility", "all")
        .authorization_bearer("not.a.token")
        .await;
    res.assert_status(StatusCode::OK);
    assert_eq!(listed_titles(&res.json()), vec!["shown"]);
}

#[tokio::test]
async fn private_filter_returns_only_own_private_items() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    let bob = seed_user(&app, "bob@example.com").await;
    seed_media(&app, &alice, "alice private", Visibility::Private).await;
    seed_media(&app, &alice, "alice public", Visibility::Public).await;
    seed_media(&app, &bob, "bob private", Visibility::Private).await;

    let res = app
        .server
        .get("/api/media")
        .add_query_param("visibility", "private")
        .authorization_bearer(&token_for(&app, &alice))
        .await;
    res.assert_status(StatusCode::OK);
    assert_eq!(listed_titles(&res.json()), vec!["alice private"]);
}

#[tokio::test]
async fn all_filter_unions_public_with_own_private() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    let bob = seed_user(&app, "bob@example.com").await;
    seed_media(&app, &alice, "alice private", Visibility::Private).await;
    seed_media(&app, &bob, "bob public", Visibility::Public).await;
    seed_media(&app, &bob, "bob private", Visibility::Private).await;

    let res = app
        .server
        .get("/api/media")
        .add_query_param("visibility", "all")
        .authorization_bearer(&token_for(&app, &alice))
        .await;
    res.assert_status(StatusCode::OK);

    let mut titles = listed_titles(&res.json());
    titles.sort();
    assert_eq!(titles, vec!["alice private", "bob public"]);
}

#[tokio::test]
async fn list_pagination_clamps_and_reports_pages() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    for i in 0..3 {
        seed_media(&app, &alice, &format!("item {i}"), Visibility::Public).await;
    }

    let res = app
        .server
        .get("/api/media")
        .add_query_param("limit", "2")
        .add_query_param("page", "2")
        .await;
    res.assert_status(StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["data"]["media"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["total"], json!(3));
    assert_eq!(body["data"]["pagination"]["pages"], json!(2));

    // out-of-range limits clamp instead of erroring
    let res = app
        .server
        .get("/api/media")
        .add_query_param("limit", "9999")
        .await;
    res.assert_status(StatusCode::OK);
    assert_eq!(res.json::<Value>()["data"]["pagination"]["limit"], json!(50));
}

#[tokio::test]
async fn get_public_item_needs_no_token() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    let media = seed_media(&app, &alice, "sunset", Visibility::Public).await;

    let res = app.server.get(&format!("/api/media/{}", media.id)).await;
    res.assert_status(StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["data"]["media"]["title"], json!("sunset"));
    assert_eq!(
        body["data"]["media"]["owner"]["email"],
        json!("alice@example.com")
    );
}

#[tokio::test]
async fn get_private_item_is_owner_only() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    let bob = seed_user(&app, "bob@example.com").await;
    let media = seed_media(&app, &alice, "diary", Visibility::Private).await;
    let url = format!("/api/media/{}", media.id);

    // anonymous
    let res = app.server.get(&url).await;
    res.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        res.json::<Value>()["message"],
        json!("Not authorized to view this media")
    );

    // another user
    let res = app
        .server
        .get(&url)
        .authorization_bearer(&token_for(&app, &bob))
        .await;
    res.assert_status(StatusCode::FORBIDDEN);

    // the owner
    let res = app
        .server
        .get(&url)
        .authorization_bearer(&token_for(&app, &alice))
        .await;
    res.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn get_with_unknown_or_malformed_id() {
    let app = spawn_app().await;

    let res = app
        .server
        .get(&format!("/api/media/{}", Uuid::new_v4()))
        .await;
    res.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>()["message"], json!("Media not found"));

    let res = app.server.get("/api/media/not-an-id").await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["message"], json!("Invalid ID format"));
}

fn upload_form(title: &str, visibility: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", title.to_string())
        .add_text("description", "taken at the beach")
        .add_text("visibility", visibility.to_string())
        .add_part(
            "file",
            Part::bytes(PAYLOAD.to_vec())
                .file_name("photo.png")
                .mime_type("image/png"),
        )
}

#[tokio::test]
async fn upload_stores_payload_and_metadata() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;

    let res = app
        .server
        .post("/api/media")
        .authorization_bearer(&token_for(&app, &alice))
        .multipart(upload_form("Beach day", "public"))
        .await;
    res.assert_status(StatusCode::CREATED);

    let body: Value = res.json();
    assert_eq!(body["message"], json!("Media uploaded successfully"));
    assert_eq!(body["data"]["media"]["size"], json!(PAYLOAD.len()));
    assert_eq!(body["data"]["media"]["fileType"], json!("image/png"));

    // the payload is served back through /files
    let file_url = body["data"]["media"]["fileUrl"].as_str().unwrap();
    let key = file_url.split_once("/files/").unwrap().1;
    assert!(key.starts_with(&format!("{}/", alice.id)));
    assert!(key.ends_with(".png"));

    let res = app.server.get(&format!("/files/{}", key)).await;
    res.assert_status(StatusCode::OK);
    assert_eq!(res.as_bytes().as_ref(), PAYLOAD);
}

#[tokio::test]
async fn upload_requires_a_token() {
    let app = spawn_app().await;
    let res = app
        .server
        .post("/api/media")
        .multipart(upload_form("Beach day", "public"))
        .await;
    res.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.json::<Value>()["message"],
        json!("Access denied. Please log in to continue")
    );
}

#[tokio::test]
async fn upload_rejects_unsupported_file_type() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;

    let form = MultipartForm::new().add_text("title", "Notes").add_part(
        "file",
        Part::bytes(b"#!/bin/sh".to_vec())
            .file_name("run.sh")
            .mime_type("application/x-sh"),
    );
    let res = app
        .server
        .post("/api/media")
        .authorization_bearer(&token_for(&app, &alice))
        .multipart(form)
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert!(
        res.json::<Value>()["message"]
            .as_str()
            .unwrap()
            .starts_with("File type not supported")
    );
}

#[tokio::test]
async fn upload_validates_title_and_visibility() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    let token = token_for(&app, &alice);

    let res = app
        .server
        .post("/api/media")
        .authorization_bearer(&token)
        .multipart(upload_form("ab", "public"))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);

    let res = app
        .server
        .post("/api/media")
        .authorization_bearer(&token)
        .multipart(upload_form("Beach day", "friends-only"))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_defaults_to_private() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;

    let form = MultipartForm::new().add_text("title", "Untagged").add_part(
        "file",
        Part::bytes(PAYLOAD.to_vec())
            .file_name("clip.mp4")
            .mime_type("video/mp4"),
    );
    let res = app
        .server
        .post("/api/media")
        .authorization_bearer(&token_for(&app, &alice))
        .multipart(form)
        .await;
    res.assert_status(StatusCode::CREATED);
    assert_eq!(
        res.json::<Value>()["data"]["media"]["visibility"],
        json!("private")
    );
}

#[tokio::test]
async fn update_is_owner_only() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    let bob = seed_user(&app, "bob@example.com").await;
    let media = seed_media(&app, &alice, "draft", Visibility::Private).await;
    let url = format!("/api/media/{}", media.id);

    // non-owner is rejected even though the id resolved
    let res = app
        .server
        .patch(&url)
        .authorization_bearer(&token_for(&app, &bob))
        .json(&json!({"title": "stolen"}))
        .await;
    res.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        res.json::<Value>()["message"],
        json!("Not authorized to update this media")
    );

    // the owner flips it public, which makes it visible anonymously
    let res = app
        .server
        .patch(&url)
        .authorization_bearer(&token_for(&app, &alice))
        .json(&json!({"visibility": "public", "title": "published"}))
        .await;
    res.assert_status(StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["data"]["media"]["title"], json!("published"));
    assert_eq!(body["data"]["media"]["visibility"], json!("public"));

    let res = app.server.get("/api/media").await;
    assert_eq!(listed_titles(&res.json()), vec!["published"]);
}

#[tokio::test]
async fn update_keeps_omitted_fields() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    let media = seed_media(&app, &alice, "keep me", Visibility::Public).await;

    let res = app
        .server
        .patch(&format!("/api/media/{}", media.id))
        .authorization_bearer(&token_for(&app, &alice))
        .json(&json!({"description": "now with a caption"}))
        .await;
    res.assert_status(StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["data"]["media"]["title"], json!("keep me"));
    assert_eq!(
        body["data"]["media"]["description"],
        json!("now with a caption")
    );
    assert_eq!(body["data"]["media"]["visibility"], json!("public"));
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;

    let res = app
        .server
        .patch(&format!("/api/media/{}", Uuid::new_v4()))
        .authorization_bearer(&token_for(&app, &alice))
        .json(&json!({"title": "anything"}))
        .await;
    res.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_owner_only_even_for_public_items() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    let bob = seed_user(&app, "bob@example.com").await;
    let media = seed_media(&app, &alice, "shared", Visibility::Public).await;
    let url = format!("/api/media/{}", media.id);

    let res = app
        .server
        .delete(&url)
        .authorization_bearer(&token_for(&app, &bob))
        .await;
    res.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        res.json::<Value>()["message"],
        json!("Not authorized to delete this media")
    );

    let res = app
        .server
        .delete(&url)
        .authorization_bearer(&token_for(&app, &alice))
        .await;
    res.assert_status(StatusCode::OK);
    assert_eq!(
        res.json::<Value>()["message"],
        json!("Media deleted successfully")
    );

    // metadata and payload are both gone
    let res = app.server.get(&url).await;
    res.assert_status(StatusCode::NOT_FOUND);
    assert!(app.state.storage.open_object(&media.file_key).await.is_err());
}

#[tokio::test]
async fn delete_succeeds_when_payload_is_already_gone() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    let media = seed_media(&app, &alice, "orphaned", Visibility::Private).await;
    app.state.storage.delete_object(&media.file_key).await.unwrap();

    let res = app
        .server
        .delete(&format!("/api/media/{}", media.id))
        .authorization_bearer(&token_for(&app, &alice))
        .await;
    res.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn writes_reject_invalid_tokens_instead_of_degrading() {
    let app = spawn_app().await;
    let alice = seed_user(&app, "alice@example.com").await;
    let media = seed_media(&app, &alice, "target", Visibility::Public).await;

    let res = app
        .server
        .delete(&format!("/api/media/{}", media.id))
        .authorization_bearer("not.a.token")
        .await;
    res.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.json::<Value>()["message"],
        json!("Invalid token. Please log in again")
    );
}

#[tokio::test]
async fn unknown_file_key_is_not_found() {
    let app = spawn_app().await;
    let res = app.server.get("/files/nobody/missing.png").await;
    res.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>()["message"], json!("File not found"));
}
