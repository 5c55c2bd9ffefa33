//! Artifact retention sweeper
//!
//! A single background loop that periodically scans completed artifacts and
//! reclaims those older than the retention window. File deletion and registry
//! eviction happen inside one registry critical section, so no other
//! operation can observe a half-removed entry. One failed deletion is logged
//! and retried on the next cycle; it never ends the loop.

use super::MediaDownloader;
use crate::types::Event;
use std::io::ErrorKind;
use std::time::{Duration, SystemTime};

impl MediaDownloader {
    /// Start the retention sweeper background task.
    ///
    /// Called once at process startup. The loop runs on the configured sweep
    /// interval until [`shutdown`](MediaDownloader::shutdown) cancels it.
    pub fn start_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let downloader = self.clone();
        let stop = self.sweeper_stop.clone();
        let period = self.config.retention.sweep_interval;

        tracing::info!(
            interval_secs = period.as_secs_f64(),
            window_secs = self.config.retention.retention_window.as_secs_f64(),
            "Retention sweeper started"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        downloader.sweep_cycle();
                    }
                    _ = stop.cancelled() => {
                        tracing::info!("Retention sweeper stopped");
                        break;
                    }
                }
            }
        })
    }

    /// Run one sweep over the current artifact snapshot.
    pub(crate) fn sweep_cycle(&self) {
        let dir = &self.config.download.download_dir;
        let window = self.config.retention.retention_window;

        for (id, filename) in self.registry.list_artifacts() {
            let path = dir.join(&filename);

            let (expired, file_missing) = match std::fs::metadata(&path) {
                Ok(meta) => (file_age(&meta).is_some_and(|age| age > window), false),
                Err(e) if e.kind() == ErrorKind::NotFound => (true, true),
                Err(e) => {
                    tracing::warn!(job_id = %id, file = %filename, error = %e, "Could not stat artifact, skipping");
                    continue;
                }
            };
            if !expired {
                continue;
            }

            let removed = self.registry.remove_artifact_with(id, |name| {
                match std::fs::remove_file(dir.join(name)) {
                    // Tolerate manual removal between the stat and the delete
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                    other => other,
                }
            });

            match removed {
                Ok(Some(name)) if file_missing => {
                    tracing::debug!(job_id = %id, file = %name, "Artifact file already gone, evicted stale entry");
                }
                Ok(Some(name)) => {
                    tracing::info!(job_id = %id, file = %name, "Expired artifact reclaimed");
                    self.emit_event(Event::ArtifactExpired {
                        client_id: id,
                        filename: name,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(job_id = %id, file = %filename, error = %e, "Failed to delete expired artifact, will retry next cycle");
                }
            }
        }
    }
}

/// Age of a file, preferring creation time and falling back to mtime on
/// filesystems that do not track creation.
fn file_age(meta: &std::fs::Metadata) -> Option<Duration> {
    let stamp = meta.created().or_else(|_| meta.modified()).ok()?;
    SystemTime::now().duration_since(stamp).ok()
}
