//! Shared application state handed to every handler.

use crate::{
    auth::{identity::GoogleVerifier, token::TokenService},
    config::AppConfig,
    services::{
        media_service::MediaService, storage_service::StorageService, user_service::UserService,
    },
};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: SqlitePool,
    pub users: UserService,
    pub media: MediaService,
    pub storage: StorageService,
    pub tokens: TokenService,
    pub google: GoogleVerifier,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, db: SqlitePool) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expiry_days);
        let google = GoogleVerifier::new(
            config.google_client_id.clone(),
            config.google_client_secret.clone(),
            config.google_callback_url.clone(),
        );
        let storage = StorageService::new(config.storage_dir.clone());

        Self {
            users: UserService::new(db.clone()),
            media: MediaService::new(db.clone()),
            storage,
            tokens,
            google,
            config,
            db,
        }
    }
}
