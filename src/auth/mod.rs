//! Credential issuance and verification.
//!
//! Two request-scoped entry points exist on purpose: [`extract::AuthUser`]
//! hard-fails with 401 when no valid identity can be resolved (write paths),
//! while [`extract::OptionalAuthUser`] degrades silently to anonymous
//! (read paths). Callers must pick the one matching the route's contract.

pub mod extract;
pub mod identity;
pub mod permission;
pub mod token;

use thiserror::Error;

/// Authentication failures, each with the message the API surfaces.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Access denied. Please log in to continue")]
    MissingToken,

    #[error("Invalid token. Please log in again")]
    InvalidToken,

    #[error("Your session has expired. Please log in again")]
    ExpiredToken,

    #[error("User no longer exists")]
    UserGone,

    /// Identity assertion could not be verified against the provider.
    #[error("Authentication failed")]
    VerificationFailed,

    /// Signing a new token failed; surfaces as a 500, not a 401.
    #[error("failed to create access token")]
    TokenCreation,
}
