//! Job handlers: starting downloads and polling artifact filenames.

use super::{DownloadRequest, FilenameQuery};
use crate::api::AppState;
use crate::error::Error;
use crate::types::{FormatOption, JobId};
use axum::{
    Json,
    extract::{Form, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// POST /download - Start a download job
#[utoipa::path(
    post,
    path = "/download",
    tag = "jobs",
    request_body(content = DownloadRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Job accepted and started", body = super::DownloadStartedResponse),
        (status = 400, description = "Missing or invalid url/format field", body = crate::error::ApiError),
        (status = 503, description = "Extraction engine unavailable", body = crate::error::ApiError)
    )
)]
pub async fn start_download(
    State(state): State<AppState>,
    Form(request): Form<DownloadRequest>,
) -> Result<impl IntoResponse, Error> {
    let url = request
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| Error::Validation("url is required".to_string()))?;

    let format: FormatOption = request
        .format
        .filter(|f| !f.is_empty())
        .ok_or_else(|| Error::Validation("format is required".to_string()))?
        .parse()
        .map_err(Error::Validation)?;

    let quality = request.quality.unwrap_or_else(|| "best".to_string());

    let client_id = state.downloader.start_job(&url, format, &quality)?;

    Ok(Json(json!({
        "status": "download started",
        "client_id": client_id,
    })))
}

/// GET /get_filename - Artifact filename of a completed job
#[utoipa::path(
    get,
    path = "/get_filename",
    tag = "jobs",
    params(
        ("client_id" = String, Query, description = "Job identifier returned by POST /download")
    ),
    responses(
        (status = 200, description = "Artifact available", body = super::FilenameResponse),
        (status = 400, description = "client_id missing"),
        (status = 404, description = "Job unknown or not yet complete")
    )
)]
pub async fn get_filename(
    State(state): State<AppState>,
    Query(query): Query<FilenameQuery>,
) -> Response {
    let Some(raw_id) = query.client_id.filter(|id| !id.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Client ID is required"})),
        )
            .into_response();
    };

    // An unparseable id cannot name a known job
    let filename = raw_id
        .parse::<JobId>()
        .ok()
        .and_then(|id| state.downloader.registry().get_artifact(id));

    match filename {
        Some(filename) => (StatusCode::OK, Json(json!({"filename": filename}))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "File not found"})),
        )
            .into_response(),
    }
}
