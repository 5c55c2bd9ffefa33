//! In-memory job registry
//!
//! Maps job identifiers to progress state and, once a job completes, to the
//! artifact filename it produced. The progress map and the artifact map live
//! behind a single mutex because the retention sweeper reads and mutates both
//! together; every accessor is one short critical section with no I/O and no
//! await points while the lock is held.

use crate::types::{JobId, Progress};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Thread-safe registry of job progress and completed artifacts.
///
/// Jobs are created implicitly by their first `set_progress`/`set_artifact`
/// call and destroyed by [`remove`](JobRegistry::remove) (normally from the
/// retention sweeper). The registry is in-memory only; entries do not survive
/// a restart.
#[derive(Debug, Default)]
pub struct JobRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    progress: HashMap<JobId, Progress>,
    artifacts: HashMap<JobId, String>,
}

impl JobRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another thread panicked mid-update of plain
    // maps; the data is still structurally sound, so recover the guard.
    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a progress percentage for a job.
    ///
    /// Progress is monotonic: a value lower than the stored percentage is
    /// ignored, and a job already marked failed stays failed. Values are
    /// clamped to [0.0, 100.0].
    pub fn set_progress(&self, id: JobId, percent: f64) {
        let percent = percent.clamp(0.0, 100.0);
        let mut inner = self.lock();
        match inner.progress.get(&id) {
            Some(Progress::Failed) => {}
            Some(Progress::Percent(current)) if *current > percent => {}
            _ => {
                inner.progress.insert(id, Progress::Percent(percent));
            }
        }
    }

    /// Mark a job as terminally failed.
    ///
    /// Overwrites any stored percentage; idempotent.
    pub fn fail(&self, id: JobId) {
        self.lock().progress.insert(id, Progress::Failed);
    }

    /// Current progress of a job, or `None` if the job is unknown
    pub fn get_progress(&self, id: JobId) -> Option<Progress> {
        self.lock().progress.get(&id).copied()
    }

    /// Record the artifact filename of a successfully completed job.
    ///
    /// Also forces progress to 100 in the same critical section, so an
    /// artifact is never observable without terminal progress.
    pub fn set_artifact(&self, id: JobId, filename: String) {
        let mut inner = self.lock();
        inner.progress.insert(id, Progress::Percent(100.0));
        inner.artifacts.insert(id, filename);
    }

    /// Artifact filename of a job, or `None` if the job is unknown or not
    /// yet complete
    pub fn get_artifact(&self, id: JobId) -> Option<String> {
        self.lock().artifacts.get(&id).cloned()
    }

    /// Remove a job entirely (both progress and artifact entries)
    pub fn remove(&self, id: JobId) {
        let mut inner = self.lock();
        inner.progress.remove(&id);
        inner.artifacts.remove(&id);
    }

    /// Snapshot of all completed artifacts as `(job id, filename)` pairs
    pub fn list_artifacts(&self) -> Vec<(JobId, String)> {
        self.lock()
            .artifacts
            .iter()
            .map(|(id, name)| (*id, name.clone()))
            .collect()
    }

    /// Number of jobs currently tracked
    pub fn len(&self) -> usize {
        self.lock().progress.len()
    }

    /// Whether the registry tracks no jobs
    pub fn is_empty(&self) -> bool {
        self.lock().progress.is_empty()
    }

    /// Delete a job's artifact and evict its entry in one critical section.
    ///
    /// Runs `delete` on the stored filename while the registry lock is held,
    /// so no other operation can observe the entry between file deletion and
    /// eviction. On `Ok` the entry (progress and artifact) is removed and the
    /// filename returned; on `Err` the entry is kept for a later retry and
    /// the error propagated. Returns `Ok(None)` when the job has no artifact.
    pub fn remove_artifact_with<E>(
        &self,
        id: JobId,
        delete: impl FnOnce(&str) -> std::result::Result<(), E>,
    ) -> std::result::Result<Option<String>, E> {
        let mut inner = self.lock();
        let Some(filename) = inner.artifacts.get(&id).cloned() else {
            return Ok(None);
        };
        delete(&filename)?;
        inner.artifacts.remove(&id);
        inner.progress.remove(&id);
        Ok(Some(filename))
    }
}
