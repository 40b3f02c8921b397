//! Axum API server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hclip_api::{create_router, metrics, ApiConfig, AppState};
use hclip_media::{check_ffmpeg, check_ytdlp, ensure_dir};
use hclip_worker::{ExpiryScheduler, JobRunner, JobStore, PipelineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("hclip=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting hclip-api");

    // Load configuration
    let config = ApiConfig::from_env();
    let pipeline = PipelineConfig::from_env();
    info!("API config: host={}, port={}", config.host, config.port);
    info!(
        "Pipeline config: clips_dir={}, base_url={}, retention={:?}",
        pipeline.clips_dir.display(),
        pipeline.public_base_url,
        pipeline.retention
    );

    ensure_dir(&pipeline.clips_dir)
        .await
        .context("Failed to create clips directory")?;

    // Jobs fail individually when a tool is missing; the server still starts.
    if let Err(e) = check_ytdlp(&pipeline.ytdlp_bin) {
        warn!("{}; downloads will fail", e);
    }
    if let Err(e) = check_ffmpeg(&pipeline.ffmpeg_bin) {
        warn!("{}; clip cutting will fail", e);
    }

    let store = JobStore::new();
    let expiry = ExpiryScheduler::new(store.clone(), pipeline.retention);
    let sweeper = expiry.spawn();
    let runner = JobRunner::with_cli_tools(Arc::new(pipeline), store, expiry);

    let metrics_handle = if config.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => {
                info!("Prometheus metrics enabled at /metrics");
                Some(handle)
            }
            Err(e) => {
                error!("Failed to install Prometheus recorder: {}", e);
                None
            }
        }
    } else {
        None
    };

    let state = AppState::new(config.clone(), runner);
    let app = create_router(state, metrics_handle);

    // Bind and serve
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweeper.abort();
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
