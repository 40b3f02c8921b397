//! Job identifiers and progress state.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::Clip;

/// Progress of a freshly created job.
pub const PROGRESS_STARTED: i32 = 0;

/// Progress once the source video has been downloaded.
pub const PROGRESS_DOWNLOADED: i32 = 30;

/// Share of the progress bar covered by clip cutting (30 -> 90).
const CUT_PROGRESS_SPAN: i32 = 60;

/// Progress of a successfully finished job.
pub const PROGRESS_COMPLETE: i32 = 100;

/// Sentinel progress of a failed job. Terminal.
pub const PROGRESS_FAILED: i32 = -1;

/// Human-readable step labels shown to polling clients.
pub mod steps {
    pub const STARTING: &str = "Starting…";
    pub const PREPARING: &str = "Preparing…";
    pub const DOWNLOADING: &str = "Downloading video…";
    pub const CUTTING: &str = "Cutting highlight clips…";
    pub const FINALIZING: &str = "Finalizing…";
    pub const FAILED: &str = "Processing failed";
}

/// Progress after `completed` of `total` clips have been cut.
///
/// Floors `completed / total * 60` on top of the download share, so three
/// clips report 50, 70 and 90.
pub fn cut_progress(completed: usize, total: usize) -> i32 {
    if total == 0 {
        return PROGRESS_DOWNLOADED + CUT_PROGRESS_SPAN;
    }
    let completed = completed.min(total);
    PROGRESS_DOWNLOADED + (completed * CUT_PROGRESS_SPAN as usize / total) as i32
}

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time view of a job, as returned to polling clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobSnapshot {
    /// 0-100, or -1 once the job failed
    pub progress: i32,
    /// Current processing step description
    pub step: String,
    /// Produced clips, present only after a successful run
    pub clips: Option<Vec<Clip>>,
}

impl JobSnapshot {
    /// State of a job right after submission.
    pub fn started() -> Self {
        Self {
            progress: PROGRESS_STARTED,
            step: steps::STARTING.to_string(),
            clips: None,
        }
    }

    /// What a poll for an unknown (or expired) job returns.
    pub fn unknown() -> Self {
        Self {
            progress: PROGRESS_STARTED,
            step: steps::PREPARING.to_string(),
            clips: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.progress == PROGRESS_FAILED
    }

    pub fn is_complete(&self) -> bool {
        self.progress == PROGRESS_COMPLETE
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        self.is_failed() || self.is_complete()
    }

    /// Apply a partial update; omitted fields are left unchanged.
    pub fn apply(&mut self, update: JobUpdate) {
        if let Some(progress) = update.progress {
            self.progress = progress;
        }
        if let Some(step) = update.step {
            self.step = step;
        }
        if let Some(clips) = update.clips {
            self.clips = Some(clips);
        }
    }
}

impl Default for JobSnapshot {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Partial update of a job record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobUpdate {
    pub progress: Option<i32>,
    pub step: Option<String>,
    pub clips: Option<Vec<Clip>>,
}

impl JobUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(mut self, progress: i32) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    pub fn clips(mut self, clips: Vec<Clip>) -> Self {
        self.clips = Some(clips);
        self
    }

    /// Terminal failure update.
    pub fn failed() -> Self {
        Self::new().progress(PROGRESS_FAILED).step(steps::FAILED)
    }

    /// Terminal success update carrying the full clip list.
    pub fn completed(clips: Vec<Clip>) -> Self {
        Self::new()
            .progress(PROGRESS_COMPLETE)
            .step(steps::FINALIZING)
            .clips(clips)
    }

    pub fn is_empty(&self) -> bool {
        self.progress.is_none() && self.step.is_none() && self.clips.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_progress_for_three_clips() {
        assert_eq!(cut_progress(0, 3), 30);
        assert_eq!(cut_progress(1, 3), 50);
        assert_eq!(cut_progress(2, 3), 70);
        assert_eq!(cut_progress(3, 3), 90);
    }

    #[test]
    fn test_cut_progress_floors() {
        // 1/7 * 60 = 8.57
        assert_eq!(cut_progress(1, 7), 38);
        assert_eq!(cut_progress(0, 0), 90);
        assert_eq!(cut_progress(5, 3), 90);
    }

    #[test]
    fn test_snapshot_defaults() {
        let started = JobSnapshot::started();
        assert_eq!(started.progress, 0);
        assert_eq!(started.step, "Starting…");
        assert!(started.clips.is_none());

        let unknown = JobSnapshot::default();
        assert_eq!(unknown.progress, 0);
        assert_eq!(unknown.step, "Preparing…");
        assert!(!unknown.is_terminal());
    }

    #[test]
    fn test_apply_partial_update() {
        let mut snapshot = JobSnapshot::started();

        snapshot.apply(JobUpdate::new().step(steps::DOWNLOADING));
        assert_eq!(snapshot.progress, 0);
        assert_eq!(snapshot.step, "Downloading video…");

        snapshot.apply(JobUpdate::new().progress(PROGRESS_DOWNLOADED));
        assert_eq!(snapshot.progress, 30);
        assert_eq!(snapshot.step, "Downloading video…");
        assert!(snapshot.clips.is_none());
    }

    #[test]
    fn test_terminal_updates() {
        let mut failed = JobSnapshot::started();
        failed.apply(JobUpdate::failed());
        assert!(failed.is_failed());
        assert!(failed.is_terminal());
        assert_eq!(failed.step, "Processing failed");
        assert!(failed.clips.is_none());

        let mut done = JobSnapshot::started();
        done.apply(JobUpdate::completed(Vec::new()));
        assert!(done.is_complete());
        assert_eq!(done.clips, Some(Vec::new()));
    }

    #[test]
    fn test_snapshot_serializes_null_clips() {
        let json = serde_json::to_value(JobSnapshot::unknown()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "progress": 0, "step": "Preparing…", "clips": null })
        );
    }

    #[test]
    fn test_job_ids_are_unique_uuids() {
        let a = JobId::new();
        let b = JobId::new();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }
}
