//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`jobs`] — Starting jobs and polling artifact filenames
//! - [`files`] — Artifact file retrieval
//! - [`qualities`] — Quality discovery
//! - [`system`] — Health, events, OpenAPI, shutdown

use serde::{Deserialize, Serialize};

mod files;
mod jobs;
mod qualities;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use files::*;
pub use jobs::*;
pub use qualities::*;
pub use system::*;

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Form body for POST /download
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DownloadRequest {
    /// Media URL to download (required)
    pub url: Option<String>,
    /// Output format: "video" or "audio" (required)
    pub format: Option<String>,
    /// Requested vertical resolution ceiling (e.g. "720") or "best"
    /// (default: "best")
    pub quality: Option<String>,
}

/// Response for POST /download
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DownloadStartedResponse {
    /// Always "download started"
    pub status: String,
    /// Identifier for polling and event filtering
    pub client_id: crate::types::JobId,
}

/// Query parameters for GET /get_filename
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct FilenameQuery {
    /// Job identifier returned by POST /download
    pub client_id: Option<String>,
}

/// Response for GET /get_filename
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FilenameResponse {
    /// Basename of the artifact in the download directory
    pub filename: String,
}

/// Query parameters for GET /download_file
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct FileQuery {
    /// Artifact basename as returned by GET /get_filename
    pub filename: Option<String>,
}

/// Query parameters for GET /get_available_qualities
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct QualitiesQuery {
    /// Media URL to inspect
    pub url: Option<String>,
}

/// Response for GET /get_available_qualities
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct QualitiesResponse {
    /// Distinct vertical resolutions, ascending
    pub qualities: Vec<String>,
}
