//! Video clipping operations.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Build the FFmpeg command that trims `[start, start + duration)` out of `input`.
pub fn cut_command(input: &Path, output: &Path, start_secs: f64, duration: f64) -> FfmpegCommand {
    FfmpegCommand::new(input, output)
        .seek(start_secs)
        .duration(duration)
        .faststart()
}

/// Cut a segment out of a video file into a new file.
///
/// The clip is re-encoded with FFmpeg's defaults for the output container,
/// so cuts are frame accurate rather than keyframe aligned.
pub async fn cut_segment(
    runner: &FfmpegRunner,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    start_secs: f64,
    duration: f64,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    info!(
        "Cutting segment: {} -> {} (start: {:.2}s, duration: {:.2}s)",
        input.display(),
        output.display(),
        start_secs,
        duration
    );

    runner.run(&cut_command(input, output, start_secs, duration)).await?;

    if !output.exists() {
        return Err(MediaError::ffmpeg_failed("Output file not created", None, None));
    }

    info!("Segment cut: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_command_args() {
        let args =
            cut_command(Path::new("src.mp4"), Path::new("clip.mp4"), 40.0, 20.0).build_args();
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert!(ss < input, "seek must be an input option");
        assert_eq!(args[ss + 1], "40.000");
        assert!(args.windows(2).any(|w| w[0] == "-movflags" && w[1] == "faststart"));
        assert_eq!(args.last().map(String::as_str), Some("clip.mp4"));
    }

    #[tokio::test]
    async fn test_missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = cut_segment(
            &FfmpegRunner::new(),
            dir.path().join("missing.mp4"),
            dir.path().join("clip.mp4"),
            10.0,
            20.0,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
