//! Configuration types for media-dl

use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Download behavior configuration (directories, containers, transcoding)
///
/// Groups settings related to where artifacts land and how the extraction
/// engine is asked to package them. Used as a nested sub-config within
/// [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadConfig {
    /// Download directory (default: "./downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Output naming template handed to the extraction engine
    /// (default: "%(title)s.%(ext)s")
    #[serde(default = "default_output_template")]
    pub output_template: String,

    /// Container to remux combined video+audio output into (default: "mp4")
    #[serde(default = "default_video_container")]
    pub video_container: String,

    /// Codec audio-only downloads are transcoded to; also the final file
    /// extension of audio artifacts (default: "m4a")
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Target bitrate for transcoded audio in kbps (default: 192)
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate_kbps: u32,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            output_template: default_output_template(),
            video_container: default_video_container(),
            audio_codec: default_audio_codec(),
            audio_bitrate_kbps: default_audio_bitrate(),
        }
    }
}

/// Artifact retention configuration
///
/// Controls the background sweeper that reclaims completed artifacts.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetentionConfig {
    /// How often the sweeper scans for expired artifacts, in seconds
    /// (default: 10)
    #[serde(default = "default_sweep_interval", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub sweep_interval: Duration,

    /// Age after which a completed artifact is eligible for deletion,
    /// measured from file creation time, in seconds (default: 30)
    #[serde(default = "default_retention_window", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub retention_window: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            sweep_interval: default_sweep_interval(),
            retention_window: default_retention_window(),
        }
    }
}

/// External tool configuration
///
/// Groups settings for locating the extraction engine binary.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to the extraction engine binary (auto-detected if None)
    #[serde(default)]
    pub extractor_path: Option<PathBuf>,

    /// Whether to search PATH for the engine binary if no explicit path is set
    /// (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            extractor_path: None,
            search_path: true,
        }
    }
}

/// API and external server integration configuration
///
/// Groups settings for external access and control interfaces.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Main configuration for MediaDownloader
///
/// Fields are organized into logical sub-configs:
/// - [`download`](DownloadConfig) — directories, containers, transcoding
/// - [`retention`](RetentionConfig) — artifact sweeper cadence and window
/// - [`tools`](ToolsConfig) — extraction engine binary discovery
/// - [`server`](ServerIntegrationConfig) — REST API integration
///
/// Sub-config fields are flattened for a mostly-flat JSON/TOML format;
/// API settings keep their own `api` grouping.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Download behavior settings
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// Artifact retention settings
    #[serde(flatten)]
    pub retention: RetentionConfig,

    /// Extraction engine binary settings
    #[serde(flatten)]
    pub tools: ToolsConfig,

    /// API and external server integration
    #[serde(flatten)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Download directory
    pub fn download_dir(&self) -> &PathBuf {
        &self.download.download_dir
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_output_template() -> String {
    "%(title)s.%(ext)s".to_string()
}

fn default_video_container() -> String {
    "mp4".to_string()
}

fn default_audio_codec() -> String {
    "m4a".to_string()
}

fn default_audio_bitrate() -> u32 {
    192
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_retention_window() -> Duration {
    Duration::from_secs(30)
}

fn default_bind_address() -> SocketAddr {
    use std::net::{IpAddr, Ipv4Addr};
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5000)
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

// Duration serialization helper (seconds as u64)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
