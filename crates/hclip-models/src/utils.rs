//! Source URL validation.

use thiserror::Error;
use url::Url;

/// Errors produced while validating a submitted source URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceUrlError {
    #[error("Invalid or missing YouTube URL")]
    Missing,

    #[error("Invalid or missing YouTube URL")]
    NotHttp,
}

/// Result type for source URL validation.
pub type SourceUrlResult<T> = Result<T, SourceUrlError>;

/// Validate a submitted source URL.
///
/// The input must itself begin with `http://` or `https://` (leading
/// whitespace is rejected) and parse as a URL with a host; the downloader
/// decides whether the page actually holds a video. Trailing whitespace is
/// dropped from the returned URL.
pub fn validate_source_url(input: Option<&str>) -> SourceUrlResult<String> {
    let raw = input.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(SourceUrlError::Missing);
    }
    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        return Err(SourceUrlError::NotHttp);
    }

    let raw = raw.trim_end();
    let parsed = Url::parse(raw).map_err(|_| SourceUrlError::NotHttp)?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(SourceUrlError::NotHttp);
    }

    Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_urls() {
        assert_eq!(
            validate_source_url(Some("https://www.youtube.com/watch?v=abc123def45")),
            Ok("https://www.youtube.com/watch?v=abc123def45".to_string())
        );
        assert_eq!(
            validate_source_url(Some("http://example.com/video ")),
            Ok("http://example.com/video".to_string())
        );
    }

    #[test]
    fn test_rejects_leading_whitespace() {
        assert_eq!(
            validate_source_url(Some("  https://example.com/video")),
            Err(SourceUrlError::NotHttp)
        );
        assert_eq!(
            validate_source_url(Some("\thttp://example.com/video")),
            Err(SourceUrlError::NotHttp)
        );
    }

    #[test]
    fn test_rejects_missing() {
        assert_eq!(validate_source_url(None), Err(SourceUrlError::Missing));
        assert_eq!(validate_source_url(Some("   ")), Err(SourceUrlError::Missing));
    }

    #[test]
    fn test_rejects_non_http() {
        assert_eq!(
            validate_source_url(Some("ftp://example.com/video")),
            Err(SourceUrlError::NotHttp)
        );
        assert_eq!(
            validate_source_url(Some("youtube.com/watch?v=abc")),
            Err(SourceUrlError::NotHttp)
        );
        assert_eq!(
            validate_source_url(Some("file:///etc/passwd")),
            Err(SourceUrlError::NotHttp)
        );
        assert_eq!(validate_source_url(Some("http://")), Err(SourceUrlError::NotHttp));
        assert_eq!(
            validate_source_url(Some("httpfoo://example.com")),
            Err(SourceUrlError::NotHttp)
        );
    }
}
