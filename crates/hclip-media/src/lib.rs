//! yt-dlp and FFmpeg CLI wrappers.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Single-file video download through yt-dlp
//! - Segment cutting through FFmpeg
//! - The `Fetcher` / `Cutter` traits the job pipeline is written against

pub mod clip;
pub mod command;
pub mod download;
pub mod error;
pub mod fs_utils;
pub mod tools;

pub use clip::{cut_command, cut_segment};
pub use command::{check_ffmpeg, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use download::{build_download_args, download_video, DownloadOptions};
pub use error::{MediaError, MediaResult};
pub use fs_utils::{ensure_dir, remove_file_if_exists};
pub use tools::{Cutter, FfmpegCutter, Fetcher, YtDlpFetcher};
