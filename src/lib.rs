//! media-share — a media-sharing backend.
//!
//! Users authenticate with a verified Google identity, upload image, video,
//! or PDF files, and control per-item visibility (`public` / `private`).
//! Metadata lives in SQLite via sqlx; payloads live on local disk behind
//! [`services::storage_service::StorageService`].

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
