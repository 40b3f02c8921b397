//! Highlight pipeline orchestration.
//!
//! One run per job: download the source, cut the fixed highlight segments in
//! order, then publish the clip list. Every failure, panics included, ends in
//! the failed terminal state; nothing is returned to whoever spawned the run.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{warn, Instrument};
use uuid::Uuid;

use hclip_media::{ensure_dir, remove_file_if_exists, Cutter, FfmpegCutter, Fetcher, YtDlpFetcher};
use hclip_models::{
    clip_filename, cut_progress, steps, Clip, JobId, JobUpdate, HIGHLIGHT_SEGMENTS,
    PROGRESS_DOWNLOADED,
};

use crate::config::PipelineConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::expiry::ExpiryScheduler;
use crate::logging::JobLogger;
use crate::metrics;
use crate::store::JobStore;

const OPERATION: &str = "highlight_pipeline";

/// Runs highlight jobs in the background.
#[derive(Clone)]
pub struct JobRunner {
    config: Arc<PipelineConfig>,
    store: JobStore,
    fetcher: Arc<dyn Fetcher>,
    cutter: Arc<dyn Cutter>,
    expiry: ExpiryScheduler,
}

impl JobRunner {
    pub fn new(
        config: Arc<PipelineConfig>,
        store: JobStore,
        fetcher: Arc<dyn Fetcher>,
        cutter: Arc<dyn Cutter>,
        expiry: ExpiryScheduler,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
            cutter,
            expiry,
        }
    }

    /// Runner backed by the yt-dlp and FFmpeg binaries named in `config`.
    pub fn with_cli_tools(
        config: Arc<PipelineConfig>,
        store: JobStore,
        expiry: ExpiryScheduler,
    ) -> Self {
        let fetcher = YtDlpFetcher::new().with_binary(&config.ytdlp_bin);
        let cutter = FfmpegCutter::new().with_binary(&config.ffmpeg_bin);
        Self::new(config, store, Arc::new(fetcher), Arc::new(cutter), expiry)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Start the pipeline for an already created job and return at once.
    ///
    /// The task is detached: the handle is only useful to tests, and dropping
    /// it does not cancel the run.
    pub fn spawn(&self, job_id: JobId, url: String) -> JoinHandle<()> {
        let runner = self.clone();
        tokio::spawn(async move { runner.run(job_id, url).await })
    }

    /// Run the pipeline to a terminal state, then schedule the record's expiry.
    ///
    /// The downloaded source is removed on failure as well as on success, so a
    /// partial download never outlives its job.
    pub async fn run(&self, job_id: JobId, url: String) {
        let logger = JobLogger::new(&job_id, OPERATION);
        let span = logger.create_span();

        async {
            let started = Instant::now();
            logger.log_start(&url);

            let result = AssertUnwindSafe(self.process(&job_id, &url, &logger))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(WorkerError::Panicked(panic_message(panic.as_ref()))));

            match result {
                Ok(clips) => {
                    let count = clips.len();
                    self.store.update(&job_id, JobUpdate::completed(clips));
                    metrics::record_job_completed(started.elapsed().as_secs_f64());
                    logger.log_completion(&format!(
                        "{} clips in {:.1}s",
                        count,
                        started.elapsed().as_secs_f64()
                    ));
                }
                Err(e) => {
                    self.store.update(&job_id, JobUpdate::failed());
                    metrics::record_job_failed(e.stage());
                    logger.log_error(&e.to_string());
                }
            }

            self.remove_source(&job_id, &logger).await;
            self.expiry.schedule(job_id.clone());
        }
        .instrument(span)
        .await
    }

    /// Download and cut. Writes intermediate progress; the terminal update is
    /// left to [`JobRunner::run`].
    async fn process(
        &self,
        job_id: &JobId,
        url: &str,
        logger: &JobLogger,
    ) -> WorkerResult<Vec<Clip>> {
        ensure_dir(&self.config.clips_dir).await?;

        self.store.update(job_id, JobUpdate::new().step(steps::DOWNLOADING));
        let source = self.source_path(job_id);

        let download_start = Instant::now();
        self.fetcher
            .fetch(url, &source)
            .await
            .map_err(|e| WorkerError::download_failed(e.to_string()))?;
        metrics::record_download_duration(download_start.elapsed().as_secs_f64());

        self.store.update(job_id, JobUpdate::new().progress(PROGRESS_DOWNLOADED));
        logger.log_progress(
            PROGRESS_DOWNLOADED,
            &format!("downloaded via {}", self.fetcher.name()),
        );

        self.store.update(job_id, JobUpdate::new().step(steps::CUTTING));

        let total = HIGHLIGHT_SEGMENTS.len();
        let mut clips = Vec::with_capacity(total);

        for (index, segment) in HIGHLIGHT_SEGMENTS.iter().enumerate() {
            let ordinal = index + 1;
            let clip_id = Uuid::new_v4().to_string();
            let output = self.config.clips_dir.join(clip_filename(&clip_id));

            let cut_start = Instant::now();
            self.cutter
                .cut(
                    &source,
                    f64::from(segment.start_secs),
                    f64::from(segment.duration_secs),
                    &output,
                )
                .await
                .map_err(|e| WorkerError::cut_failed(ordinal, e.to_string()))?;
            metrics::record_cut_duration(cut_start.elapsed().as_secs_f64());
            metrics::record_clip_produced();

            clips.push(Clip::highlight(
                clip_id,
                ordinal,
                segment,
                &self.config.public_base_url,
            ));

            let progress = cut_progress(ordinal, total);
            self.store.update(job_id, JobUpdate::new().progress(progress));
            logger.log_progress(progress, &format!("clip {}/{} ready", ordinal, total));
        }

        Ok(clips)
    }

    fn source_path(&self, job_id: &JobId) -> PathBuf {
        self.config.source_path(job_id.as_str())
    }

    /// Best-effort removal of the downloaded source.
    async fn remove_source(&self, job_id: &JobId, logger: &JobLogger) {
        if let Err(e) = remove_file_if_exists(self.source_path(job_id)).await {
            logger.log_warning(&format!("Failed to remove source video: {}", e));
        }
    }
}

impl std::fmt::Debug for JobRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRunner")
            .field("config", &self.config)
            .field("fetcher", &self.fetcher.name())
            .field("cutter", &self.cutter.name())
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        warn!("Pipeline panicked with a non-string payload");
        "unknown panic".to_string()
    }
}
