//! Request-scoped identity extractors.

use crate::{auth::AuthError, errors::AppError, models::user::User, state::AppState};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Extractor that requires a verified caller identity.
///
/// Rejects with 401 on a missing, malformed, or expired token, and when the
/// token's subject no longer exists as a user. On success the handler
/// receives the full user record, role included.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;
        let claims = state.tokens.verify(token)?;

        let user = state
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::UserGone)?;

        Ok(AuthUser(user))
    }
}

/// Extractor that resolves a caller identity when possible and otherwise
/// treats the request as anonymous.
///
/// An absent, malformed, or expired token all yield `None`; verification
/// failure never propagates past this boundary. Intended for read paths
/// where anonymous access is valid.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<Uuid>);

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = bearer_token(parts)
            .and_then(|token| state.tokens.verify(token).ok())
            .map(|claims| claims.sub);

        Ok(OptionalAuthUser(caller))
    }
}
