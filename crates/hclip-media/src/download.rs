//! Video download using yt-dlp.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::command::{last_line, DEFAULT_YTDLP_BIN};
use crate::error::{MediaError, MediaResult};

/// Format selection and container preferences for yt-dlp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// yt-dlp `-f` format selector
    pub format: String,
    /// Container used when separate video and audio streams are merged
    pub merge_output_format: Option<String>,
}

impl Default for DownloadOptions {
    /// Best mp4 video merged with best m4a audio, falling back to a single mp4.
    fn default() -> Self {
        Self {
            format: "bestvideo[ext=mp4]+bestaudio[ext=m4a]/mp4".to_string(),
            merge_output_format: Some("mp4".to_string()),
        }
    }
}

/// Build the yt-dlp argument list for a single-file download.
pub fn build_download_args(
    url: &str,
    output_path: &Path,
    options: &DownloadOptions,
) -> Vec<String> {
    let mut args = vec!["-f".to_string(), options.format.clone()];

    if let Some(container) = &options.merge_output_format {
        args.push("--merge-output-format".to_string());
        args.push(container.clone());
    }

    args.push("-o".to_string());
    args.push(output_path.to_string_lossy().to_string());
    args.push(url.to_string());
    args
}

/// Download a video from URL using yt-dlp.
///
/// The file lands exactly at `output_path`. A leftover file from an earlier
/// attempt is removed first so yt-dlp never skips the download.
pub async fn download_video(
    binary: &Path,
    url: &str,
    output_path: impl AsRef<Path>,
    options: &DownloadOptions,
) -> MediaResult<()> {
    let output_path = output_path.as_ref();

    which::which(binary).map_err(|_| MediaError::YtDlpNotFound(binary.display().to_string()))?;

    if output_path.exists() {
        warn!(
            "Removing stale download target {} before fetching",
            output_path.display()
        );
        tokio::fs::remove_file(output_path).await?;
    }

    info!("Downloading video from {} to {}", url, output_path.display());

    let args = build_download_args(url, output_path, options);
    let output = Command::new(binary)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp stderr: {}", stderr);

        return Err(MediaError::download_failed(format!(
            "yt-dlp failed: {}",
            last_line(&stderr)
        )));
    }

    if !output_path.exists() {
        return Err(MediaError::download_failed("Output file not created"));
    }

    let file_size = output_path.metadata()?.len();
    info!(
        output = %output_path.display(),
        size_mb = file_size as f64 / (1024.0 * 1024.0),
        "Downloaded video successfully"
    );

    Ok(())
}

/// Default yt-dlp binary path.
pub fn default_ytdlp_binary() -> PathBuf {
    PathBuf::from(DEFAULT_YTDLP_BIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_download_args() {
        let args = build_download_args(
            "https://youtube.com/watch?v=abc",
            Path::new("/tmp/job-1.mp4"),
            &DownloadOptions::default(),
        );
        assert_eq!(
            args,
            vec![
                "-f",
                "bestvideo[ext=mp4]+bestaudio[ext=m4a]/mp4",
                "--merge-output-format",
                "mp4",
                "-o",
                "/tmp/job-1.mp4",
                "https://youtube.com/watch?v=abc",
            ]
        );
    }

    #[test]
    fn test_download_args_without_merge() {
        let options = DownloadOptions {
            format: "best".to_string(),
            merge_output_format: None,
        };
        let args = build_download_args("https://example.com/v", Path::new("out.mp4"), &options);
        assert!(!args.iter().any(|a| a == "--merge-output-format"));
        assert_eq!(args.last().map(String::as_str), Some("https://example.com/v"));
    }

    #[tokio::test]
    async fn test_missing_ytdlp_is_reported() {
        let err = download_video(
            Path::new("/nonexistent/hclip-yt-dlp"),
            "https://example.com/v",
            "out.mp4",
            &DownloadOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MediaError::YtDlpNotFound(_)));
    }
}
