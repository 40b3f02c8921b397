//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Cutting clip {index} failed: {message}")]
    CutFailed { index: usize, message: String },

    #[error("Pipeline panicked: {0}")]
    Panicked(String),

    #[error("Media error: {0}")]
    Media(#[from] hclip_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn download_failed(msg: impl Into<String>) -> Self {
        Self::DownloadFailed(msg.into())
    }

    /// `index` is the 1-based ordinal of the clip being cut.
    pub fn cut_failed(index: usize, msg: impl Into<String>) -> Self {
        Self::CutFailed {
            index,
            message: msg.into(),
        }
    }

    /// Short label for metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            WorkerError::DownloadFailed(_) => "download",
            WorkerError::CutFailed { .. } => "cut",
            WorkerError::Panicked(_) => "panic",
            WorkerError::Media(_) | WorkerError::Io(_) => "setup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_stages() {
        let err = WorkerError::cut_failed(2, "ffmpeg exited with 1");
        assert_eq!(err.to_string(), "Cutting clip 2 failed: ffmpeg exited with 1");
        assert_eq!(err.stage(), "cut");

        let err = WorkerError::download_failed("yt-dlp failed: 404");
        assert_eq!(err.stage(), "download");

        let err: WorkerError = std::io::Error::from(std::io::ErrorKind::PermissionDenied).into();
        assert_eq!(err.stage(), "setup");
    }
}
