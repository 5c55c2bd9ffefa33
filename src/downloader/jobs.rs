//! Download job spawning and execution
//!
//! Every accepted request becomes one spawned task that drives the extraction
//! engine end to end: resolve the format selector, stream raw progress into
//! the publisher, verify the output file, and record the terminal outcome.
//! Failures never escape the task — they become the registry's failure
//! sentinel plus a `download_failed` broadcast.

use super::MediaDownloader;
use crate::error::{Error, Result};
use crate::extractor::{ExtractionRequest, FormatSelection};
use crate::types::{Event, FormatOption, JobId};

/// Buffer size for the raw progress channel between engine and runner
const PROGRESS_CHANNEL_BUFFER: usize = 64;

/// Resolution ceilings a client may request. Anything else (including
/// "best") selects the best available streams with no height cap.
const SUPPORTED_HEIGHTS: [u32; 9] = [144, 240, 360, 480, 720, 1080, 1440, 2160, 4320];

/// Map a requested quality to an engine format selector.
pub(crate) fn resolve_format_selector(quality: &str) -> String {
    match quality.parse::<u32>() {
        Ok(height) if SUPPORTED_HEIGHTS.contains(&height) => {
            format!("bestvideo[height<={height}]+bestaudio/best")
        }
        _ => "bestvideo+bestaudio/best".to_string(),
    }
}

impl MediaDownloader {
    /// Accept a download request and spawn its job.
    ///
    /// Returns the job id immediately; the download itself runs in its own
    /// task, unbounded (no queue, no concurrency cap). Results are observed
    /// through the registry and the event channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the URL does not parse. Everything
    /// past this point is reported asynchronously.
    pub fn start_job(&self, url: &str, format: FormatOption, quality: &str) -> Result<JobId> {
        url::Url::parse(url).map_err(|e| Error::Validation(format!("invalid url: {e}")))?;

        let id = JobId::new();
        let downloader = self.clone();
        let url = url.to_string();
        let quality = quality.to_string();

        tracing::info!(job_id = %id, %format, quality = %quality, "Download job accepted");

        tokio::spawn(async move {
            downloader.run_job(&url, format, &quality, id).await;
        });

        Ok(id)
    }

    /// Run one job to its terminal state. Never returns an error: all
    /// failures are converted into the failure sentinel and a broadcast.
    pub(crate) async fn run_job(&self, url: &str, format: FormatOption, quality: &str, id: JobId) {
        match self.execute_job(url, format, quality, id).await {
            Ok(filename) => {
                self.registry.set_artifact(id, filename.clone());
                self.emit_event(Event::DownloadComplete {
                    client_id: id,
                    filename,
                });
                tracing::info!(job_id = %id, "Download job complete");
            }
            Err(e) => {
                tracing::error!(job_id = %id, error = %e, "Download job failed");
                self.registry.fail(id);
                self.emit_event(Event::DownloadFailed { client_id: id });
            }
        }
    }

    async fn execute_job(
        &self,
        url: &str,
        format: FormatOption,
        quality: &str,
        id: JobId,
    ) -> Result<String> {
        let download_cfg = &self.config.download;

        let selection = match format {
            FormatOption::Video => FormatSelection::Video {
                selector: resolve_format_selector(quality),
                container: download_cfg.video_container.clone(),
            },
            FormatOption::Audio => FormatSelection::Audio {
                codec: download_cfg.audio_codec.clone(),
                bitrate_kbps: download_cfg.audio_bitrate_kbps,
            },
        };

        let request = ExtractionRequest {
            url: url.to_string(),
            selection,
            output_template: download_cfg.download_dir.join(&download_cfg.output_template),
        };

        let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel(PROGRESS_CHANNEL_BUFFER);
        let download = self.extractor.download(&request, progress_tx);
        tokio::pin!(download);

        // Forward raw progress while the engine runs. Once the engine drops
        // its sender the channel closes and only the download future remains.
        let mut progress_open = true;
        let outcome = loop {
            if progress_open {
                tokio::select! {
                    maybe = progress_rx.recv() => match maybe {
                        Some(raw) => self.publisher.consume(id, raw).await,
                        None => progress_open = false,
                    },
                    result = &mut download => break result,
                }
            } else {
                break (&mut download).await;
            }
        };

        // Drain updates still buffered after the engine returned, so a
        // trailing Finished is published before the terminal event.
        while let Ok(raw) = progress_rx.try_recv() {
            self.publisher.consume(id, raw).await;
        }

        let mut path = outcome?;

        // The transcode step names the final audio file after the target
        // codec, not the original stream's extension.
        if format == FormatOption::Audio {
            path.set_extension(download_cfg.audio_codec.as_str());
        }

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(Error::Extraction(format!(
                "output file missing after download: {}",
                path.display()
            )));
        }

        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::Extraction(format!(
                    "engine returned a path without a filename: {}",
                    path.display()
                ))
            })
    }
}
