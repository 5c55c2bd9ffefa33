//! Artifact file retrieval.

use super::FileQuery;
use crate::api::AppState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::io::ErrorKind;
use std::path::{Component, Path};
use tokio_util::io::ReaderStream;

/// Whether a requested filename is a plain basename that stays inside the
/// download directory. Rejects separators, parent references, and anything
/// else that resolves to more than one path component.
pub(crate) fn is_plain_filename(name: &str) -> bool {
    if name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// GET /download_file - Stream an artifact as an attachment
#[utoipa::path(
    get,
    path = "/download_file",
    tag = "files",
    params(
        ("filename" = String, Query, description = "Artifact basename as returned by GET /get_filename")
    ),
    responses(
        (status = 200, description = "File contents (attachment)", content_type = "application/octet-stream"),
        (status = 400, description = "Filename missing or escaping the download directory"),
        (status = 404, description = "File not found")
    )
)]
pub async fn download_file(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Response {
    let Some(filename) = query.filename.filter(|f| !f.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Filename is required").into_response();
    };

    if !is_plain_filename(&filename) {
        tracing::warn!(file = %filename, "Rejected file request escaping the download directory");
        return (StatusCode::BAD_REQUEST, "Invalid filename").into_response();
    }

    let path = state.config.download.download_dir.join(&filename);

    // The sweeper may have reclaimed the file between a status poll and this
    // request; that is a plain 404, not a failure.
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return (StatusCode::NOT_FOUND, "File not found").into_response();
        }
        Err(e) => {
            tracing::error!(file = %filename, error = %e, "Failed to open artifact");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file").into_response();
        }
    };

    // Media titles may contain characters that are invalid in a header value
    let disposition = header::HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        filename.replace(['"', '\\'], "_")
    ))
    .unwrap_or_else(|_| header::HeaderValue::from_static("attachment"));

    let body = Body::from_stream(ReaderStream::new(file));

    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}
