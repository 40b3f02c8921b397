//! Clip metadata and the highlight segment plan.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A fixed (start, duration) window cut out of the source video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HighlightSegment {
    /// Start offset in seconds
    pub start_secs: u32,
    /// Duration in seconds
    pub duration_secs: u32,
}

impl HighlightSegment {
    pub const fn new(start_secs: u32, duration_secs: u32) -> Self {
        Self {
            start_secs,
            duration_secs,
        }
    }

    /// Duration formatted as `MM:SS`.
    pub fn duration_label(&self) -> String {
        format!("{:02}:{:02}", self.duration_secs / 60, self.duration_secs % 60)
    }
}

/// Segments cut from every source video, in order.
pub const HIGHLIGHT_SEGMENTS: [HighlightSegment; 3] = [
    HighlightSegment::new(10, 20),
    HighlightSegment::new(40, 20),
    HighlightSegment::new(70, 20),
];

/// Stored filename for a clip id.
pub fn clip_filename(clip_id: &str) -> String {
    format!("clip-{}.mp4", clip_id)
}

/// Public URL of a stored clip file under `base_url`.
pub fn clip_public_url(base_url: &str, filename: &str) -> String {
    format!("{}/clips/{}", base_url.trim_end_matches('/'), filename)
}

/// Metadata for one produced clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Unique clip ID (independent of the job ID)
    pub id: String,
    /// "Highlight N", N being the 1-based ordinal
    pub title: String,
    /// Duration label, e.g. "00:20"
    pub duration: String,
    pub preview_url: String,
    pub download_url: String,
}

impl Clip {
    /// Build the metadata for the `ordinal`-th (1-based) highlight.
    pub fn highlight(
        id: impl Into<String>,
        ordinal: usize,
        segment: &HighlightSegment,
        base_url: &str,
    ) -> Self {
        let id = id.into();
        let url = clip_public_url(base_url, &clip_filename(&id));
        Self {
            id,
            title: format!("Highlight {}", ordinal),
            duration: segment.duration_label(),
            preview_url: url.clone(),
            download_url: url,
        }
    }

    /// Stored filename backing this clip.
    pub fn filename(&self) -> String {
        clip_filename(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_plan() {
        let starts: Vec<u32> = HIGHLIGHT_SEGMENTS.iter().map(|s| s.start_secs).collect();
        assert_eq!(starts, vec![10, 40, 70]);
        assert!(HIGHLIGHT_SEGMENTS.iter().all(|s| s.duration_label() == "00:20"));
    }

    #[test]
    fn test_duration_label_minutes() {
        assert_eq!(HighlightSegment::new(0, 95).duration_label(), "01:35");
    }

    #[test]
    fn test_public_url_trims_trailing_slash() {
        assert_eq!(
            clip_public_url("http://localhost:4000/", "clip-a.mp4"),
            "http://localhost:4000/clips/clip-a.mp4"
        );
    }

    #[test]
    fn test_highlight_clip_json_shape() {
        let clip = Clip::highlight("abc", 2, &HIGHLIGHT_SEGMENTS[1], "https://cdn.example.com");
        assert_eq!(clip.filename(), "clip-abc.mp4");

        let json = serde_json::to_value(&clip).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "abc",
                "title": "Highlight 2",
                "duration": "00:20",
                "previewUrl": "https://cdn.example.com/clips/clip-abc.mp4",
                "downloadUrl": "https://cdn.example.com/clips/clip-abc.mp4",
            })
        );
    }
}
