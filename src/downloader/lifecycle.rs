//! Shutdown coordination

use super::MediaDownloader;
use crate::error::Result;
use crate::types::Event;

impl MediaDownloader {
    /// Initiate graceful shutdown.
    ///
    /// Stops the retention sweeper and broadcasts a final `shutdown` event so
    /// connected listeners can close their streams. In-flight download jobs
    /// run to their terminal state; there is no cancellation path for a job
    /// once started.
    pub fn shutdown(&self) -> Result<()> {
        tracing::info!("Shutting down media downloader");
        self.sweeper_stop.cancel();
        self.emit_event(Event::Shutdown);
        Ok(())
    }
}
