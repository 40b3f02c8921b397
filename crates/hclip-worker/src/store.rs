//! In-memory job store.
//!
//! One `HashMap` behind a single `RwLock`. Each job is written only by its own
//! runner, and no critical section awaits, so pollers and writers of different
//! jobs never hold each other up for longer than a map operation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, warn};

use hclip_models::{JobId, JobSnapshot, JobUpdate};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Job already exists: {0}")]
    AlreadyExists(JobId),
}

/// Process-wide job state, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<JobId, JobSnapshot>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh record for a newly submitted job.
    pub fn create(&self, job_id: &JobId) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        if jobs.contains_key(job_id) {
            return Err(StoreError::AlreadyExists(job_id.clone()));
        }
        jobs.insert(job_id.clone(), JobSnapshot::started());
        debug!(job_id = %job_id, "Job record created");
        Ok(())
    }

    /// Apply a partial update.
    ///
    /// Absent ids (already expired) are ignored. Records already in a terminal
    /// state are left untouched.
    pub fn update(&self, job_id: &JobId, update: JobUpdate) {
        if update.is_empty() {
            return;
        }
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        let Some(snapshot) = jobs.get_mut(job_id) else {
            debug!(job_id = %job_id, "Ignoring update for unknown job");
            return;
        };
        if snapshot.is_terminal() {
            warn!(
                job_id = %job_id,
                progress = snapshot.progress,
                "Ignoring update for job in terminal state"
            );
            return;
        }
        snapshot.apply(update);
    }

    /// Current snapshot, or the unknown-job default.
    pub fn read(&self, job_id: &JobId) -> JobSnapshot {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(job_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Remove a record. Returns whether anything was removed.
    pub fn expire(&self, job_id: &JobId) -> bool {
        self.jobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(job_id)
            .is_some()
    }

    pub fn contains(&self, job_id: &JobId) -> bool {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(job_id)
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.jobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records not yet in a terminal state.
    pub fn active_count(&self) -> usize {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|snapshot| !snapshot.is_terminal())
            .count()
    }
}
