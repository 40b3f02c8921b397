//! Highlight job execution.
//!
//! This crate provides:
//! - The in-memory job store polled by the API
//! - The background pipeline that downloads a video and cuts highlight clips
//! - Deferred expiry of finished job records

pub mod config;
pub mod error;
pub mod expiry;
pub mod logging;
pub mod metrics;
pub mod runner;
pub mod store;

pub use config::PipelineConfig;
pub use error::{WorkerError, WorkerResult};
pub use expiry::ExpiryScheduler;
pub use logging::JobLogger;
pub use runner::JobRunner;
pub use store::{JobStore, StoreError};
