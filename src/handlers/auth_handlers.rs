//! Credential issuance: Google verification in, signed access token out.

use crate::{
    auth::extract::AuthUser,
    errors::AppError,
    handlers::{ApiResponse, UserDto},
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GoogleVerifyRequest {
    pub token: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct AuthData {
    pub token: String,
    pub user: UserDto,
}

/// POST /api/auth/google/verify — verify a client-submitted Google ID
/// token, find-or-create the user, and issue an access token.
///
/// Every verification failure is a 401; this path never falls back to
/// anonymous.
pub async fn google_verify(
    State(state): State<AppState>,
    Json(req): Json<GoogleVerifyRequest>,
) -> Result<Json<ApiResponse<AuthData>>, AppError> {
    let id_token = req
        .token
        .ok_or_else(|| AppError::unauthorized("Token is required"))?;

    let identity = state.google.verify_id_token(&id_token).await?;
    let user = state.users.resolve_identity(&identity).await?;
    let token = state.tokens.sign(user.id)?;

    Ok(Json(ApiResponse::ok(
        "Authentication successful",
        AuthData {
            token,
            user: user.into(),
        },
    )))
}

/// GET /api/auth/google — kick off the server-redirect code flow.
pub async fn google_redirect(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.google.authorize_url())
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
}

/// GET /api/auth/google/callback — exchange the authorization code and
/// bounce back to the frontend with a token, or with an error marker on
/// any failure.
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
) -> Redirect {
    let frontend = state.config.frontend_url.trim_end_matches('/');

    let issued = async {
        let code = query.code.as_deref()?;
        let identity = state.google.exchange_code(code).await.ok()?;
        let user = state.users.resolve_identity(&identity).await.ok()?;
        state.tokens.sign(user.id).ok()
    }
    .await;

    match issued {
        Some(token) => Redirect::temporary(&format!(
            "{}/auth/success?token={}",
            frontend,
            urlencoding::encode(&token)
        )),
        None => {
            tracing::warn!("google callback failed, redirecting to login");
            Redirect::temporary(&format!("{}/login?error=authentication_failed", frontend))
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CurrentUserData {
    pub user: UserDto,
}

/// GET /api/auth/me — the caller's own record.
pub async fn current_user(
    AuthUser(user): AuthUser,
) -> Json<ApiResponse<CurrentUserData>> {
    Json(ApiResponse::ok(
        "User data retrieved successfully",
        CurrentUserData { user: user.into() },
    ))
}
