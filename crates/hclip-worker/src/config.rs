//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default HTTP port, used to derive the default public base URL.
pub const DEFAULT_PORT: u16 = 4000;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory clips are written to and served from
    pub clips_dir: PathBuf,
    /// Directory for downloaded source videos
    pub work_dir: PathBuf,
    /// Base URL clip links are built from
    pub public_base_url: String,
    /// How long a finished job stays readable
    pub retention: Duration,
    /// yt-dlp binary
    pub ytdlp_bin: PathBuf,
    /// FFmpeg binary
    pub ffmpeg_bin: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clips_dir: PathBuf::from("public/clips"),
            work_dir: PathBuf::from("."),
            public_base_url: format!("http://localhost:{}", DEFAULT_PORT),
            retention: Duration::from_secs(300), // 5 minutes
            ytdlp_bin: PathBuf::from("yt-dlp"),
            ffmpeg_bin: PathBuf::from("ffmpeg"),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            clips_dir: std::env::var("CLIPS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/clips")),
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            retention: Duration::from_secs(
                std::env::var("JOB_RETENTION_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            ytdlp_bin: std::env::var("YTDLP_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("yt-dlp")),
            ffmpeg_bin: std::env::var("FFMPEG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("ffmpeg")),
        }
    }

    /// Temporary download path for a job's source video.
    pub fn source_path(&self, job_id: &str) -> PathBuf {
        self.work_dir.join(format!("{}.mp4", job_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.public_base_url, "http://localhost:4000");
        assert_eq!(config.retention, Duration::from_secs(300));
        assert_eq!(config.clips_dir, PathBuf::from("public/clips"));
    }

    #[test]
    fn test_source_path_is_job_specific() {
        let config = PipelineConfig {
            work_dir: PathBuf::from("/tmp/hclip"),
            ..Default::default()
        };
        assert_eq!(config.source_path("job-1"), PathBuf::from("/tmp/hclip/job-1.mp4"));
    }
}
