//! Quality discovery handler.

use super::QualitiesQuery;
use crate::api::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /get_available_qualities - List available resolutions for a URL
#[utoipa::path(
    get,
    path = "/get_available_qualities",
    tag = "discovery",
    params(
        ("url" = String, Query, description = "Media URL to inspect")
    ),
    responses(
        (status = 200, description = "Distinct resolutions, ascending", body = super::QualitiesResponse),
        (status = 400, description = "url missing"),
        (status = 500, description = "Engine could not resolve the URL")
    )
)]
pub async fn get_available_qualities(
    State(state): State<AppState>,
    Query(query): Query<QualitiesQuery>,
) -> Response {
    let Some(url) = query.url.filter(|u| !u.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "URL is required"})),
        )
            .into_response();
    };

    match state.downloader.list_qualities(&url).await {
        Ok(qualities) => (StatusCode::OK, Json(json!({"qualities": qualities}))).into_response(),
        Err(e) => {
            tracing::error!(url = %url, error = %e, "Quality discovery failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to fetch qualities"})),
            )
                .into_response()
        }
    }
}
