//! Prometheus metrics for the API server.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Install the Prometheus recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "hclip_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "hclip_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "hclip_http_requests_in_flight";

    // Job intake
    pub const JOBS_SUBMITTED_TOTAL: &str = "hclip_jobs_submitted_total";
    pub const JOBS_REJECTED_TOTAL: &str = "hclip_jobs_rejected_total";
}

/// Record HTTP request metrics.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a job accepted for processing.
pub fn record_job_submitted() {
    counter!(names::JOBS_SUBMITTED_TOTAL).increment(1);
}

/// Record a submission refused for a missing or invalid URL.
pub fn record_job_rejected() {
    counter!(names::JOBS_REJECTED_TOTAL).increment(1);
}

struct PathPatterns {
    uuid: Regex,
    progress: Regex,
    clips: Regex,
}

fn path_patterns() -> &'static PathPatterns {
    static PATTERNS: OnceLock<PathPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| PathPatterns {
        uuid: Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
            .expect("uuid pattern compiles"),
        progress: Regex::new(r"^/progress/[^/]+$").expect("progress pattern compiles"),
        clips: Regex::new(r"/clips/[a-zA-Z0-9_.:-]+").expect("clips pattern compiles"),
    })
}

/// Sanitize path for metrics labels (remove IDs, etc.).
fn sanitize_path(path: &str) -> String {
    let patterns = path_patterns();
    let path = patterns.uuid.replace_all(path, ":id");
    let path = patterns.progress.replace_all(&path, "/progress/:job_id");
    let path = patterns.clips.replace_all(&path, "/clips/:clip_name");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/progress/550e8400-e29b-41d4-a716-446655440000"),
            "/progress/:job_id"
        );
        assert_eq!(sanitize_path("/progress/not-a-uuid"), "/progress/:job_id");
        assert_eq!(
            sanitize_path("/clips/clip-550e8400-e29b-41d4-a716-446655440000.mp4"),
            "/clips/:clip_name"
        );
        assert_eq!(sanitize_path("/process-video"), "/process-video");
    }
}
