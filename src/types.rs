//! Core types for media-dl

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for a download job.
///
/// An opaque 128-bit random token handed to the client when a job is accepted.
/// Collision-resistant for the lifetime of the in-memory registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct JobId(pub uuid::Uuid);

impl JobId {
    /// Generate a fresh random job identifier
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Get the inner UUID value
    pub fn get(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Requested output format for a download job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FormatOption {
    /// Combined video+audio, remuxed into a single container
    Video,
    /// Audio-only stream, transcoded to a fixed codec
    Audio,
}

impl std::str::FromStr for FormatOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(FormatOption::Video),
            "audio" => Ok(FormatOption::Audio),
            other => Err(format!("unknown format '{other}', expected 'video' or 'audio'")),
        }
    }
}

impl std::fmt::Display for FormatOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatOption::Video => write!(f, "video"),
            FormatOption::Audio => write!(f, "audio"),
        }
    }
}

/// Progress state of a job as stored in the registry
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Progress {
    /// Download in flight or complete, percentage in [0.0, 100.0]
    Percent(f64),
    /// Terminal failure sentinel
    Failed,
}

impl Progress {
    /// Whether this is a terminal state (100% or failed)
    pub fn is_terminal(&self) -> bool {
        match self {
            Progress::Percent(p) => *p >= 100.0,
            Progress::Failed => true,
        }
    }
}

/// Event emitted during the job lifecycle
///
/// Broadcast to all subscribers; listeners filter by `client_id`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Progress update for a running job
    ProgressUpdate {
        /// Job identifier
        client_id: JobId,
        /// Progress percentage (0.0 to 100.0, two decimal places)
        progress: f64,
    },

    /// Job completed successfully and its artifact is available
    DownloadComplete {
        /// Job identifier
        client_id: JobId,
        /// Basename of the artifact in the download directory
        filename: String,
    },

    /// Job failed (extraction error or missing output file)
    DownloadFailed {
        /// Job identifier
        client_id: JobId,
    },

    /// An artifact outlived the retention window and was reclaimed
    ArtifactExpired {
        /// Job identifier whose registry entry was evicted
        client_id: JobId,
        /// Basename of the deleted file
        filename: String,
    },

    /// Graceful shutdown initiated
    Shutdown,
}

impl Event {
    /// Stable event-type label, used as the SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            Event::ProgressUpdate { .. } => "progress_update",
            Event::DownloadComplete { .. } => "download_complete",
            Event::DownloadFailed { .. } => "download_failed",
            Event::ArtifactExpired { .. } => "artifact_expired",
            Event::Shutdown => "shutdown",
        }
    }
}
