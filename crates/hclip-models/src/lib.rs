//! Shared data models for the highlight clip service.
//!
//! This crate provides Serde-serializable types for:
//! - Job identifiers, progress snapshots and partial updates
//! - Clip metadata and the fixed highlight segment plan
//! - Source URL validation

pub mod clip;
pub mod job;
pub mod utils;

// Re-export common types
pub use clip::{clip_filename, clip_public_url, Clip, HighlightSegment, HIGHLIGHT_SEGMENTS};
pub use job::{cut_progress, steps, JobId, JobSnapshot, JobUpdate};
pub use job::{PROGRESS_COMPLETE, PROGRESS_DOWNLOADED, PROGRESS_FAILED, PROGRESS_STARTED};
pub use utils::{validate_source_url, SourceUrlError, SourceUrlResult};
