//! Traits and types for the media extraction engine

use async_trait::async_trait;
use std::path::PathBuf;

/// One download request handed to the extraction engine
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Target media URL
    pub url: String,

    /// Requested output packaging
    pub selection: FormatSelection,

    /// Output naming template, already joined with the download directory
    /// (e.g. `downloads/%(title)s.%(ext)s`)
    pub output_template: PathBuf,
}

/// How the engine should package its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSelection {
    /// Combined video+audio, remuxed into a single container
    Video {
        /// Engine format selector string
        /// (e.g. `bestvideo[height<=720]+bestaudio/best`)
        selector: String,
        /// Container to remux into (e.g. "mp4")
        container: String,
    },
    /// Best available audio-only stream, transcoded
    Audio {
        /// Target codec; also the final file extension (e.g. "m4a")
        codec: String,
        /// Target bitrate in kbps
        bitrate_kbps: u32,
    },
}

/// Raw progress event as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawProgress {
    /// Bytes fetched so far out of a (possibly estimated, possibly unknown)
    /// total
    Downloading {
        /// Bytes downloaded so far
        downloaded_bytes: u64,
        /// Total size in bytes, or an estimate, or `None` when unknown
        total_bytes: Option<u64>,
    },
    /// The engine finished fetching and post-processing
    Finished,
}

/// One stream variant discovered in metadata-only mode
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamVariant {
    /// Engine-assigned format identifier
    pub format_id: String,
    /// Vertical resolution in pixels, when the variant carries video
    pub height: Option<u32>,
    /// File extension of the variant, when advertised
    pub ext: Option<String>,
}

/// Trait for media extraction engines
///
/// Implementations resolve a URL to media streams, download and package them,
/// and push [`RawProgress`] events into the provided channel as they arrive.
/// The engine owns output naming: `download` returns the path produced by the
/// naming template.
///
/// # Examples
///
/// ```no_run
/// use media_dl::extractor::{CliExtractor, Extractor};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = CliExtractor::from_path()
///     .expect("extraction binary not found");
///
/// let variants = engine.probe("https://media.example.com/watch?v=abc").await?;
/// for variant in variants {
///     println!("{} -> {:?}p", variant.format_id, variant.height);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Download and package one media URL.
    ///
    /// Progress events are delivered through `progress` on a best-effort
    /// basis; a full channel must never stall the engine. A `Finished` event
    /// is sent once the output file is in place.
    ///
    /// # Returns
    ///
    /// The path of the produced file, as named by the output template.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be resolved, the transfer fails,
    /// or the engine process cannot be executed.
    async fn download(
        &self,
        request: &ExtractionRequest,
        progress: tokio::sync::mpsc::Sender<RawProgress>,
    ) -> crate::Result<PathBuf>;

    /// Inspect available stream variants without downloading anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot resolve the URL or its metadata
    /// output cannot be parsed.
    async fn probe(&self, url: &str) -> crate::Result<Vec<StreamVariant>>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
