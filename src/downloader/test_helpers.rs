//! Shared helpers for downloader unit tests

use crate::config::Config;
use crate::downloader::MediaDownloader;
use crate::error::{Error, Result};
use crate::extractor::{ExtractionRequest, Extractor, FormatSelection, RawProgress, StreamVariant};
use crate::types::{Event, JobId};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Scripted stand-in for the extraction engine.
pub(crate) struct MockExtractor {
    /// Progress events sent before the terminal outcome
    pub progress: Vec<RawProgress>,
    /// What happens after the progress script runs out
    pub behavior: MockBehavior,
    /// Variants returned from `probe`
    pub variants: Vec<StreamVariant>,
    /// When set, `probe` fails with this discovery error
    pub probe_error: Option<String>,
}

pub(crate) enum MockBehavior {
    /// Write the output file, send `Finished`, return its path
    Succeed,
    /// Fail the download with an extraction error
    Fail(String),
    /// Claim success but never write the output file
    VanishOutput,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self {
            progress: vec![
                RawProgress::Downloading {
                    downloaded_bytes: 250,
                    total_bytes: Some(1000),
                },
                RawProgress::Downloading {
                    downloaded_bytes: 750,
                    total_bytes: Some(1000),
                },
            ],
            behavior: MockBehavior::Succeed,
            variants: vec![
                variant("18", Some(360)),
                variant("22", Some(720)),
                variant("140", None),
            ],
            probe_error: None,
        }
    }
}

pub(crate) fn variant(format_id: &str, height: Option<u32>) -> StreamVariant {
    StreamVariant {
        format_id: format_id.to_string(),
        height,
        ext: None,
    }
}

/// Derive a deterministic media title from the request URL, so concurrent
/// test jobs against different URLs produce distinct artifacts.
pub(crate) fn title_from_url(url: &str) -> String {
    url.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("media")
        .replace(['?', '=', '&', ':'], "_")
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn download(
        &self,
        request: &ExtractionRequest,
        progress: tokio::sync::mpsc::Sender<RawProgress>,
    ) -> Result<PathBuf> {
        for raw in &self.progress {
            progress.send(*raw).await.ok();
        }

        let dir = request
            .output_template
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        let ext = match &request.selection {
            FormatSelection::Video { container, .. } => container.clone(),
            FormatSelection::Audio { codec, .. } => codec.clone(),
        };
        let path = dir.join(format!("{}.{ext}", title_from_url(&request.url)));

        match &self.behavior {
            MockBehavior::Fail(message) => Err(Error::Extraction(message.clone())),
            MockBehavior::VanishOutput => {
                progress.send(RawProgress::Finished).await.ok();
                Ok(path)
            }
            MockBehavior::Succeed => {
                tokio::fs::write(&path, b"media bytes").await.map_err(Error::Io)?;
                progress.send(RawProgress::Finished).await.ok();
                Ok(path)
            }
        }
    }

    async fn probe(&self, _url: &str) -> Result<Vec<StreamVariant>> {
        if let Some(message) = &self.probe_error {
            return Err(Error::Discovery(message.clone()));
        }
        Ok(self.variants.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Test downloader with a default (successful) mock engine and a temp
/// download directory. Keep the returned TempDir alive for the test's
/// duration.
pub(crate) async fn create_test_downloader() -> (MediaDownloader, tempfile::TempDir) {
    create_test_downloader_with(MockExtractor::default()).await
}

pub(crate) async fn create_test_downloader_with(
    mock: MockExtractor,
) -> (MediaDownloader, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.download.download_dir = temp_dir.path().to_path_buf();
    config.retention.sweep_interval = Duration::from_millis(50);
    config.retention.retention_window = Duration::from_millis(200);

    let downloader = MediaDownloader::with_extractor(config, Arc::new(mock))
        .await
        .unwrap();
    (downloader, temp_dir)
}

/// Wait (with a timeout) for the terminal event of a specific job,
/// discarding progress updates and other jobs' events along the way.
pub(crate) async fn wait_for_terminal(
    events: &mut tokio::sync::broadcast::Receiver<Event>,
    id: JobId,
) -> Event {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await {
                Ok(
                    event @ (Event::DownloadComplete { client_id, .. }
                    | Event::DownloadFailed { client_id }),
                ) if client_id == id => return event,
                Ok(_) => continue,
                Err(e) => panic!("event channel closed while waiting for job {id}: {e}"),
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for terminal event of job {id}"))
}
