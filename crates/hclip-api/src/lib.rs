//! Axum HTTP API server.
//!
//! This crate provides:
//! - Job submission and progress polling endpoints
//! - Static serving of produced clips
//! - Security headers, CORS and request logging
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
