//! Application state.

use hclip_worker::{JobRunner, JobStore};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: JobStore,
    pub runner: JobRunner,
}

impl AppState {
    /// Create new application state. The store is the one the runner writes to.
    pub fn new(config: ApiConfig, runner: JobRunner) -> Self {
        Self {
            config,
            store: runner.store().clone(),
            runner,
        }
    }
}
