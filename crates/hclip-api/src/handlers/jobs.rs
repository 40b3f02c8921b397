//! Job submission and progress polling.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use hclip_models::{validate_source_url, JobId, JobSnapshot, SourceUrlError};

use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

/// Body of `POST /process-video`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessVideoRequest {
    pub youtube_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessVideoResponse {
    pub success: bool,
    pub job_id: JobId,
}

/// Create a job and start its pipeline in the background.
///
/// Responds as soon as the job record exists; the pipeline is never awaited.
/// A body that is not JSON, or whose `youtubeUrl` is not a string, is treated
/// like a missing URL.
pub async fn process_video(
    State(state): State<AppState>,
    payload: Result<Json<ProcessVideoRequest>, JsonRejection>,
) -> ApiResult<Json<ProcessVideoResponse>> {
    let raw_url = match &payload {
        Ok(Json(request)) => request.youtube_url.as_deref(),
        Err(rejection) => {
            debug!("Rejected process-video body: {}", rejection);
            None
        }
    };

    let url = validate_source_url(raw_url).inspect_err(|e: &SourceUrlError| {
        debug!(error = ?e, "Invalid source URL");
        metrics::record_job_rejected();
    })?;

    let job_id = JobId::new();
    state.store.create(&job_id)?;
    metrics::record_job_submitted();

    info!(job_id = %job_id, url = %url, "Job submitted");

    // Detached: the response below never waits on the pipeline.
    drop(state.runner.spawn(job_id.clone(), url));

    Ok(Json(ProcessVideoResponse {
        success: true,
        job_id,
    }))
}

/// Current snapshot of a job. Unknown or expired ids get the default snapshot.
pub async fn get_progress(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Json<JobSnapshot> {
    Json(state.store.read(&JobId::from_string(job_id)))
}
