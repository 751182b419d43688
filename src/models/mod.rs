//! Core data models for the media sharing service.
//!
//! These entities map to database tables via `sqlx::FromRow` and serialize
//! naturally as JSON via `serde`.

pub mod media;
pub mod user;
