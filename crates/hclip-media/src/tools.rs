//! Fetch and cut capabilities used by the job pipeline.
//!
//! The pipeline only sees these two traits; the yt-dlp and FFmpeg backed
//! implementations live here, and tests substitute in-process fakes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::clip::cut_segment;
use crate::command::{check_ffmpeg, check_ytdlp, FfmpegRunner};
use crate::download::{default_ytdlp_binary, download_video, DownloadOptions};
use crate::error::MediaResult;

/// Retrieves a remote video into a single local file.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Download `url` to exactly `output`.
    async fn fetch(&self, url: &str, output: &Path) -> MediaResult<()>;
}

/// Trims a local video into a new local file.
#[async_trait]
pub trait Cutter: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Write `duration_secs` seconds of `input`, starting at `start_secs`, to `output`.
    async fn cut(
        &self,
        input: &Path,
        start_secs: f64,
        duration_secs: f64,
        output: &Path,
    ) -> MediaResult<()>;
}

/// [`Fetcher`] backed by the yt-dlp CLI.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    binary: PathBuf,
    options: DownloadOptions,
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpFetcher {
    pub fn new() -> Self {
        Self {
            binary: default_ytdlp_binary(),
            options: DownloadOptions::default(),
        }
    }

    /// Use a specific yt-dlp binary.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Resolve the binary, failing if it is not installed.
    pub fn check(&self) -> MediaResult<PathBuf> {
        check_ytdlp(&self.binary)
    }
}

#[async_trait]
impl Fetcher for YtDlpFetcher {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch(&self, url: &str, output: &Path) -> MediaResult<()> {
        download_video(&self.binary, url, output, &self.options).await
    }
}

/// [`Cutter`] backed by the FFmpeg CLI.
#[derive(Debug, Clone, Default)]
pub struct FfmpegCutter {
    runner: FfmpegRunner,
}

impl FfmpegCutter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific FFmpeg binary.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.runner = self.runner.with_binary(binary);
        self
    }

    /// Resolve the binary, failing if it is not installed.
    pub fn check(&self) -> MediaResult<PathBuf> {
        check_ffmpeg(self.runner.binary())
    }
}

#[async_trait]
impl Cutter for FfmpegCutter {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn cut(
        &self,
        input: &Path,
        start_secs: f64,
        duration_secs: f64,
        output: &Path,
    ) -> MediaResult<()> {
        cut_segment(&self.runner, input, output, start_secs, duration_secs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;

    #[test]
    fn test_binary_overrides() {
        let fetcher = YtDlpFetcher::new().with_binary("/opt/bin/yt-dlp");
        assert_eq!(fetcher.binary, PathBuf::from("/opt/bin/yt-dlp"));

        let cutter = FfmpegCutter::new().with_binary("/opt/bin/ffmpeg");
        assert_eq!(cutter.runner.binary(), Path::new("/opt/bin/ffmpeg"));
    }

    #[test]
    fn test_check_reports_missing_tools() {
        let fetcher = YtDlpFetcher::new().with_binary("/nonexistent/yt-dlp");
        assert!(matches!(fetcher.check(), Err(MediaError::YtDlpNotFound(_))));

        let cutter = FfmpegCutter::new().with_binary("/nonexistent/ffmpeg");
        assert!(matches!(cutter.check(), Err(MediaError::FfmpegNotFound(_))));
    }
}
