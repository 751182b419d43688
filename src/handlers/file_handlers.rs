//! Streams stored payloads back to clients.
//!
//! Payloads are addressed by storage key and are world-readable, mirroring
//! the public-read ACL the original deployment used; visibility gates the
//! metadata endpoints, not these bytes.

use crate::{errors::AppError, models::media::Media, state::AppState};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Response,
};
use tokio_util::io::ReaderStream;

/// GET /files/{*key} — stream a stored payload.
pub async fn download_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let media = state
        .media
        .find_by_key(&key)
        .await?
        .ok_or_else(|| AppError::not_found("File not found"))?;

    let file = state.storage.open_object(&key).await?;
    let stream = ReaderStream::new(file);

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = StatusCode::OK;
    set_file_headers(response.headers_mut(), &media);

    Ok(response)
}

fn set_file_headers(headers: &mut HeaderMap, media: &Media) {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&media.file_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );

    let length = media.size_bytes.max(0);
    headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from_str(&length.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("0")),
    );

    if let Ok(value) = HeaderValue::from_str(&media.updated_at.to_rfc2822()) {
        headers.insert(header::LAST_MODIFIED, value);
    }
}
