pub mod media_service;
pub mod storage_service;
pub mod user_service;
