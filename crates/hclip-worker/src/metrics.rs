//! Pipeline metrics.
//!
//! Only emits through the `metrics` facade; the API binary installs the
//! Prometheus recorder. Without a recorder these are no-ops.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_COMPLETED_TOTAL: &str = "hclip_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "hclip_jobs_failed_total";
    pub const JOB_DURATION_SECONDS: &str = "hclip_job_duration_seconds";
    pub const DOWNLOAD_DURATION_SECONDS: &str = "hclip_download_duration_seconds";
    pub const CUT_DURATION_SECONDS: &str = "hclip_cut_duration_seconds";
    pub const CLIPS_PRODUCED_TOTAL: &str = "hclip_clips_produced_total";
    pub const JOBS_EXPIRED_TOTAL: &str = "hclip_jobs_expired_total";
}

/// Record job completed.
pub fn record_job_completed(duration_secs: f64) {
    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
    histogram!(names::JOB_DURATION_SECONDS).record(duration_secs);
}

/// Record job failed, labelled with the failing stage.
pub fn record_job_failed(stage: &str) {
    let labels = [("stage", stage.to_string())];
    counter!(names::JOBS_FAILED_TOTAL, &labels).increment(1);
}

pub fn record_download_duration(duration_secs: f64) {
    histogram!(names::DOWNLOAD_DURATION_SECONDS).record(duration_secs);
}

pub fn record_cut_duration(duration_secs: f64) {
    histogram!(names::CUT_DURATION_SECONDS).record(duration_secs);
}

pub fn record_clip_produced() {
    counter!(names::CLIPS_PRODUCED_TOTAL).increment(1);
}

pub fn record_jobs_expired(count: usize) {
    counter!(names::JOBS_EXPIRED_TOTAL).increment(count as u64);
}
