//! Defines routes for the media sharing API.
//!
//! ## Structure
//! - **Auth endpoints**
//!   - `GET    /api/auth/google` — redirect to the Google consent screen
//!   - `GET    /api/auth/google/callback` — code-flow callback
//!   - `POST   /api/auth/google/verify` — verify a client-submitted ID token
//!   - `GET    /api/auth/me` — current user (requires token)
//!
//! - **Media endpoints**
//!   - `GET    /api/media` — list (visibility-scoped, paginated)
//!   - `POST   /api/media` — upload (multipart, requires token)
//!   - `GET    /api/media/{id}` — single item (visibility-gated)
//!   - `PATCH  /api/media/{id}` — update (owner only)
//!   - `DELETE /api/media/{id}` — delete (owner only)
//!
//! - **User endpoints**
//!   - `GET    /api/users/profile` — own profile (requires token)
//!   - `GET    /api/users/media` — own media (requires token)
//!   - `GET    /api/users/{id}` — public profile + public media
//!
//! - **Files**: `GET /files/{*key}` streams stored payloads; the wildcard
//!   allows owner-prefixed keys like `"{owner}/{name}.png"`.

use crate::{
    handlers::{
        auth_handlers::{current_user, google_callback, google_redirect, google_verify},
        file_handlers::download_file,
        health_handlers::{healthz, readyz},
        media_handlers::{delete_media, get_media, list_media, update_media, upload_media},
        user_handlers::{public_profile, user_media, user_profile},
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the router with shared state and the CORS / body-limit / trace
/// layers applied.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);
    // leave headroom for multipart framing around the payload itself
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes + 64 * 1024);

    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // auth
        .route("/api/auth/google", get(google_redirect))
        .route("/api/auth/google/callback", get(google_callback))
        .route("/api/auth/google/verify", post(google_verify))
        .route("/api/auth/me", get(current_user))
        // media
        .route("/api/media", get(list_media).post(upload_media))
        .route(
            "/api/media/{id}",
            get(get_media).patch(update_media).delete(delete_media),
        )
        // users
        .route("/api/users/profile", get(user_profile))
        .route("/api/users/media", get(user_media))
        .route("/api/users/{id}", get(public_profile))
        // stored payloads
        .route("/files/{*key}", get(download_file))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    match origin.parse::<HeaderValue>() {
        Ok(value) if origin != "*" => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        _ => CorsLayer::permissive(),
    }
}
