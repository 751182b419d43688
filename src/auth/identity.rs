//! Google identity provider client.
//!
//! Two assertion paths exist: the SPA submits an ID token directly
//! (`verify_id_token`), and the server-redirect code flow exchanges an
//! authorization code for one (`exchange_code`). Both end in the same
//! audience-checked verification.

use crate::auth::AuthError;
use serde::Deserialize;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// The subject Google vouched for, as extracted from a verified assertion.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Google subject id (`sub`).
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CodeExchangeResponse {
    id_token: String,
}

/// Verifies Google identity assertions against the registered client id.
#[derive(Clone)]
pub struct GoogleVerifier {
    http: reqwest::Client,
    client_id: String,
    client_secret: Option<String>,
    callback_url: String,
}

impl GoogleVerifier {
    pub fn new(client_id: String, client_secret: Option<String>, callback_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
            callback_url,
        }
    }

    /// Consent-screen URL for the server-redirect code flow.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}",
            AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.callback_url),
            urlencoding::encode("openid email profile"),
        )
    }

    /// Verify a client-submitted ID token and extract the subject.
    ///
    /// Any verification error, including an audience mismatch, surfaces as
    /// `AuthError::VerificationFailed`; this path never degrades to
    /// anonymous.
    pub async fn verify_id_token(&self, id_token: &str) -> Result<VerifiedIdentity, AuthError> {
        let response = self
            .http
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|err| {
                tracing::warn!("tokeninfo request failed: {}", err);
                AuthError::VerificationFailed
            })?;

        if !response.status().is_success() {
            tracing::debug!("tokeninfo rejected token: {}", response.status());
            return Err(AuthError::VerificationFailed);
        }

        let info: TokenInfo = response.json().await.map_err(|err| {
            tracing::warn!("tokeninfo returned malformed body: {}", err);
            AuthError::VerificationFailed
        })?;

        if info.aud != self.client_id {
            tracing::warn!("tokeninfo audience mismatch");
            return Err(AuthError::VerificationFailed);
        }

        let email = info.email.ok_or(AuthError::VerificationFailed)?;

        Ok(VerifiedIdentity {
            subject: info.sub,
            email,
            name: info.name,
            given_name: info.given_name,
            family_name: info.family_name,
            picture: info.picture,
        })
    }

    /// Exchange an authorization code from the redirect flow, then verify
    /// the resulting ID token like any other assertion.
    pub async fn exchange_code(&self, code: &str) -> Result<VerifiedIdentity, AuthError> {
        let client_secret = self
            .client_secret
            .as_deref()
            .ok_or(AuthError::VerificationFailed)?;

        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", client_secret),
            ("redirect_uri", self.callback_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!("code exchange request failed: {}", err);
                AuthError::VerificationFailed
            })?;

        if !response.status().is_success() {
            tracing::debug!("code exchange rejected: {}", response.status());
            return Err(AuthError::VerificationFailed);
        }

        let exchanged: CodeExchangeResponse = response.json().await.map_err(|err| {
            tracing::warn!("code exchange returned malformed body: {}", err);
            AuthError::VerificationFailed
        })?;

        self.verify_id_token(&exchanged.id_token).await
    }
}
