//! Source video metadata.

use serde::{Deserialize, Serialize};

/// A candidate source video chosen from a channel's uploads.
///
/// Created by the source selector from YouTube Data API results and
/// read-only for the rest of the pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSource {
    /// YouTube video id (the `v=` parameter)
    pub id: String,
    /// Video title as published
    pub title: String,
    /// Duration in seconds
    pub duration_secs: f64,
}

impl VideoSource {
    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }

    /// Title reduced to alphanumerics, for use in filenames.
    ///
    /// Non-alphanumeric runs collapse to a single underscore; a title
    /// with no usable characters falls back to the video id.
    pub fn sanitized_title(&self) -> String {
        let mut out = String::with_capacity(self.title.len());
        let mut last_was_sep = true;
        for c in self.title.chars() {
            if c.is_ascii_alphanumeric() {
                out.push(c);
                last_was_sep = false;
            } else if !last_was_sep {
                out.push('_');
                last_was_sep = true;
            }
        }
        let trimmed = out.trim_end_matches('_');
        if trimmed.is_empty() {
            self.id.clone()
        } else {
            trimmed.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(title: &str) -> VideoSource {
        VideoSource {
            id: "abc123XYZ".to_string(),
            title: title.to_string(),
            duration_secs: 600.0,
        }
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            source("x").watch_url(),
            "https://www.youtube.com/watch?v=abc123XYZ"
        );
    }

    #[test]
    fn test_sanitized_title() {
        assert_eq!(
            source("24 Modern UI: Python / Qt!").sanitized_title(),
            "24_Modern_UI_Python_Qt"
        );
        assert_eq!(source("hello").sanitized_title(), "hello");
    }

    #[test]
    fn test_sanitized_title_falls_back_to_id() {
        assert_eq!(source("///???").sanitized_title(), "abc123XYZ");
    }
}
