//! Progress normalization and broadcasting
//!
//! Converts the raw byte counters reported by the extraction engine into
//! clamped percentage values, records them in the [`JobRegistry`], and fans
//! them out to every event subscriber.

use crate::extractor::RawProgress;
use crate::registry::JobRegistry;
use crate::types::{Event, JobId, Progress};
use std::sync::Arc;

/// Normalize raw byte counters into a percentage.
///
/// Returns `downloaded / total * 100` clamped to [0.0, 100.0], rounded to two
/// decimal places. When the total is unknown or zero the result is 0.0 —
/// never a division error.
pub fn normalize_percent(downloaded_bytes: u64, total_bytes: Option<u64>) -> f64 {
    let total = match total_bytes {
        Some(total) if total > 0 => total,
        _ => return 0.0,
    };
    let percent = (downloaded_bytes as f64 / total as f64) * 100.0;
    round2(percent.clamp(0.0, 100.0))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Broadcasts normalized progress to all subscribers and the registry.
///
/// Fan-out is best-effort: a disconnected subscriber simply misses events
/// (`send` errors are dropped). The registry write happens before the
/// broadcast so a poll immediately after an event can never observe an older
/// value. Each publish ends with a single cooperative yield; publishing never
/// blocks the calling job beyond that.
#[derive(Clone)]
pub struct ProgressPublisher {
    registry: Arc<JobRegistry>,
    event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl ProgressPublisher {
    /// Create a publisher over the given registry and event channel
    pub fn new(registry: Arc<JobRegistry>, event_tx: tokio::sync::broadcast::Sender<Event>) -> Self {
        Self { registry, event_tx }
    }

    /// Record and broadcast a progress percentage for a job.
    ///
    /// The value is clamped to [0.0, 100.0] and rounded to two decimals
    /// before it is stored or published.
    pub async fn publish(&self, id: JobId, percent: f64) {
        let percent = round2(percent.clamp(0.0, 100.0));
        self.registry.set_progress(id, percent);
        // Broadcast the stored value, not the raw one: when the engine's size
        // estimate shrinks mid-transfer, subscribers must never observe a
        // regressing percentage. A job already in the failed state gets no
        // further progress events.
        if let Some(Progress::Percent(stored)) = self.registry.get_progress(id) {
            self.event_tx
                .send(Event::ProgressUpdate {
                    client_id: id,
                    progress: stored,
                })
                .ok();
        }
        tokio::task::yield_now().await;
    }

    /// Consume one raw engine progress event.
    ///
    /// A `Finished` signal force-publishes exactly 100, regardless of the
    /// last computed byte ratio.
    pub async fn consume(&self, id: JobId, raw: RawProgress) {
        match raw {
            RawProgress::Downloading {
                downloaded_bytes,
                total_bytes,
            } => {
                self.publish(id, normalize_percent(downloaded_bytes, total_bytes))
                    .await;
            }
            RawProgress::Finished => {
                self.publish(id, 100.0).await;
            }
        }
    }
}
