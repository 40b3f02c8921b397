//! Deferred removal of finished jobs.
//!
//! Each terminal job gets exactly one entry in a min-heap keyed by its
//! deadline. A single background sweeper sleeps until the earliest deadline
//! and is woken early whenever a sooner entry is pushed.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use hclip_models::JobId;

use crate::metrics;
use crate::store::JobStore;

#[derive(Debug, PartialEq, Eq)]
struct ExpiryEntry {
    deadline: Instant,
    job_id: JobId,
}

impl Ord for ExpiryEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then_with(|| self.job_id.as_str().cmp(other.job_id.as_str()))
    }
}

impl PartialOrd for ExpiryEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Inner {
    heap: Mutex<BinaryHeap<Reverse<ExpiryEntry>>>,
    wake: Notify,
    store: JobStore,
    retention: Duration,
}

/// Schedules job records for removal a fixed time after they finish.
#[derive(Debug, Clone)]
pub struct ExpiryScheduler {
    inner: Arc<Inner>,
}

impl ExpiryScheduler {
    pub fn new(store: JobStore, retention: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                heap: Mutex::new(BinaryHeap::new()),
                wake: Notify::new(),
                store,
                retention,
            }),
        }
    }

    /// Schedule `job_id` for removal after the retention window.
    pub fn schedule(&self, job_id: JobId) {
        let deadline = Instant::now() + self.inner.retention;
        debug!(
            job_id = %job_id,
            retention_secs = self.inner.retention.as_secs(),
            "Job expiry scheduled"
        );
        self.inner
            .heap
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Reverse(ExpiryEntry { deadline, job_id }));
        self.inner.wake.notify_one();
    }

    /// Number of scheduled, not yet removed entries.
    pub fn pending(&self) -> usize {
        self.inner
            .heap
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.inner
            .heap
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .peek()
            .map(|Reverse(entry)| entry.deadline)
    }

    /// Remove every job whose deadline has passed. Returns how many were removed.
    pub fn expire_due(&self) -> usize {
        let now = Instant::now();
        let due: Vec<JobId> = {
            let mut heap = self
                .inner
                .heap
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let mut due = Vec::new();
            while heap
                .peek()
                .is_some_and(|Reverse(entry)| entry.deadline <= now)
            {
                if let Some(Reverse(entry)) = heap.pop() {
                    due.push(entry.job_id);
                }
            }
            due
        };

        let mut removed = 0;
        for job_id in due {
            if self.inner.store.expire(&job_id) {
                debug!(job_id = %job_id, "Job record expired");
                removed += 1;
            }
        }
        if removed > 0 {
            metrics::record_jobs_expired(removed);
        }
        removed
    }

    /// Sweep loop. Runs until the task is dropped or aborted.
    pub async fn run(self) {
        info!(
            "Starting job expiry sweeper (retention: {:?})",
            self.inner.retention
        );

        loop {
            match self.next_deadline() {
                Some(deadline) => {
                    tokio::select! {
                        _ = sleep_until(deadline) => {
                            self.expire_due();
                        }
                        _ = self.inner.wake.notified() => {}
                    }
                }
                None => self.inner.wake.notified().await,
            }
        }
    }

    /// Spawn the sweep loop as a background task.
    pub fn spawn(&self) -> JoinHandle<()> {
        tokio::spawn(self.clone().run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expire_due_respects_deadline() {
        let store = JobStore::new();
        let scheduler = ExpiryScheduler::new(store.clone(), Duration::from_secs(300));
        let job_id = JobId::new();
        store.create(&job_id).unwrap();

        scheduler.schedule(job_id.clone());
        assert_eq!(scheduler.expire_due(), 0);
        assert_eq!(scheduler.pending(), 1);

        tokio::time::advance(Duration::from_secs(300)).await;
        assert_eq!(scheduler.expire_due(), 1);
        assert_eq!(scheduler.pending(), 0);
        assert!(!store.contains(&job_id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_after_retention() {
        let store = JobStore::new();
        let scheduler = ExpiryScheduler::new(store.clone(), Duration::from_secs(300));
        let sweeper = scheduler.spawn();

        let first = JobId::new();
        store.create(&first).unwrap();
        scheduler.schedule(first.clone());

        tokio::time::sleep(Duration::from_secs(100)).await;
        let second = JobId::new();
        store.create(&second).unwrap();
        scheduler.schedule(second.clone());

        tokio::time::sleep(Duration::from_secs(199)).await;
        assert!(store.contains(&first));
        assert!(store.contains(&second));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!store.contains(&first));
        assert!(store.contains(&second));

        tokio::time::sleep(Duration::from_secs(100)).await;
        assert!(!store.contains(&second));
        assert_eq!(scheduler.pending(), 0);

        sweeper.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_removed_job_is_not_counted() {
        let store = JobStore::new();
        let scheduler = ExpiryScheduler::new(store.clone(), Duration::from_secs(1));
        let job_id = JobId::new();

        scheduler.schedule(job_id);
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(scheduler.expire_due(), 0);
        assert_eq!(scheduler.pending(), 0);
    }
}
