//! Core downloader implementation split into focused submodules.
//!
//! The `MediaDownloader` struct and its methods are organized by domain:
//! - [`jobs`] - Download job spawning and execution
//! - [`qualities`] - Metadata-only quality discovery
//! - [`sweeper`] - Artifact retention sweeper
//! - [`lifecycle`] - Shutdown coordination

mod jobs;
mod lifecycle;
mod qualities;
mod sweeper;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::extractor::{CliExtractor, Extractor};
use crate::progress::ProgressPublisher;
use crate::registry::JobRegistry;
use std::sync::Arc;

/// Buffer size for the event broadcast channel. A subscriber that falls more
/// than this many events behind starts missing events (best-effort fan-out).
const EVENT_CHANNEL_BUFFER: usize = 1000;

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
///
/// Owns the job registry, the event broadcast channel, the extraction engine
/// handle, and the retention sweeper's stop token. One instance per process;
/// clones share all state.
#[derive(Clone)]
pub struct MediaDownloader {
    /// Shared job registry (progress + artifacts)
    pub(crate) registry: Arc<JobRegistry>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<crate::types::Event>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Extraction engine (trait object for pluggable implementations)
    pub(crate) extractor: Arc<dyn Extractor>,
    /// Progress publisher feeding the registry and the event channel
    pub(crate) publisher: ProgressPublisher,
    /// Cancelled on shutdown; stops the retention sweeper
    pub(crate) sweeper_stop: tokio_util::sync::CancellationToken,
}

impl MediaDownloader {
    /// Create a new MediaDownloader instance.
    ///
    /// Creates the download directory and resolves the extraction engine
    /// binary: an explicitly configured path wins, otherwise PATH is searched
    /// (when enabled).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExternalTool`] when no extraction binary can be
    /// found, or an I/O error when the download directory cannot be created.
    pub async fn new(config: Config) -> Result<Self> {
        let extractor: Arc<dyn Extractor> = if let Some(ref path) = config.tools.extractor_path {
            Arc::new(CliExtractor::new(path.clone()))
        } else if config.tools.search_path {
            CliExtractor::from_path()
                .map(|e| Arc::new(e) as Arc<dyn Extractor>)
                .ok_or_else(|| {
                    Error::ExternalTool(
                        "no extraction binary found in PATH; set tools.extractor_path".to_string(),
                    )
                })?
        } else {
            return Err(Error::Config {
                message: "extractor_path is unset and PATH search is disabled".to_string(),
                key: Some("extractor_path".to_string()),
            });
        };

        Self::with_extractor(config, extractor).await
    }

    /// Create a MediaDownloader with an injected extraction engine.
    ///
    /// Useful for tests and for deployments that run the engine out of
    /// process behind the same trait.
    pub async fn with_extractor(config: Config, extractor: Arc<dyn Extractor>) -> Result<Self> {
        tokio::fs::create_dir_all(&config.download.download_dir)
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create download directory '{}': {}",
                        config.download.download_dir.display(),
                        e
                    ),
                ))
            })?;

        let (event_tx, _rx) = tokio::sync::broadcast::channel(EVENT_CHANNEL_BUFFER);
        let registry = Arc::new(JobRegistry::new());
        let publisher = ProgressPublisher::new(Arc::clone(&registry), event_tx.clone());

        tracing::info!(
            engine = extractor.name(),
            download_dir = %config.download.download_dir.display(),
            "Media downloader initialized"
        );

        Ok(Self {
            registry,
            event_tx,
            config: Arc::new(config),
            extractor,
            publisher,
            sweeper_stop: tokio_util::sync::CancellationToken::new(),
        })
    }

    /// Subscribe to job lifecycle events.
    ///
    /// Multiple subscribers are supported; each receives all events
    /// independently. Events are broadcast to every listener regardless of
    /// which job they concern — consumers filter by `client_id`. A subscriber
    /// that falls behind the channel buffer receives a `RecvError::Lagged`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use media_dl::{Config, MediaDownloader};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let downloader = MediaDownloader::new(Config::default()).await?;
    ///
    ///     let mut events = downloader.subscribe();
    ///     tokio::spawn(async move {
    ///         while let Ok(event) = events.recv().await {
    ///             tracing::info!(?event, "job event");
    ///         }
    ///     });
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<crate::types::Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration.
    ///
    /// The configuration is wrapped in an Arc, so this is a cheap clone.
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Shared access to the job registry
    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Emit an event to all subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// job execution never depends on anyone listening.
    pub(crate) fn emit_event(&self, event: crate::types::Event) {
        self.event_tx.send(event).ok();
    }

    /// Spawn the REST API server in a background task.
    ///
    /// The server runs concurrently with job execution and listens on the
    /// configured bind address (default: 127.0.0.1:5000).
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let downloader = self.clone();
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(downloader, config).await })
    }
}
