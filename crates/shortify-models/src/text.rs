//! Title overlay configuration and word wrapping.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default overlay font size in pixels.
pub const DEFAULT_FONT_SIZE: u32 = 50;
/// Default wrap width in characters.
pub const DEFAULT_WRAP_WIDTH: usize = 20;
/// Default maximum number of wrapped lines.
pub const DEFAULT_MAX_LINES: usize = 3;
/// Default backdrop padding in pixels.
pub const DEFAULT_PADDING_PX: u32 = 20;
/// Default backdrop corner radius in pixels.
pub const DEFAULT_CORNER_RADIUS_PX: u32 = 15;
/// Default backdrop alpha (0 transparent, 255 opaque).
pub const DEFAULT_BACKDROP_ALPHA: u8 = 160;

/// Configuration for the title text block composited by the annotator.
///
/// A pure value: it has no lifecycle beyond the annotation call that
/// consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpec {
    /// Text content (typically the source video title)
    pub content: String,
    /// Path to the TTF font file
    pub font_path: PathBuf,
    /// Font size in pixels
    pub font_size: u32,
    /// Maximum line width in characters
    pub wrap_width: usize,
    /// Maximum number of lines before truncation with an ellipsis
    pub max_lines: usize,
    /// Backdrop padding around the text block, in pixels
    pub padding_px: u32,
    /// Backdrop corner radius in pixels
    pub corner_radius_px: u32,
    /// Backdrop alpha (0 transparent, 255 opaque)
    pub backdrop_alpha: u8,
}

impl TextSpec {
    /// Create a spec with default layout values.
    pub fn new(content: impl Into<String>, font_path: impl Into<PathBuf>) -> Self {
        Self {
            content: content.into(),
            font_path: font_path.into(),
            font_size: DEFAULT_FONT_SIZE,
            wrap_width: DEFAULT_WRAP_WIDTH,
            max_lines: DEFAULT_MAX_LINES,
            padding_px: DEFAULT_PADDING_PX,
            corner_radius_px: DEFAULT_CORNER_RADIUS_PX,
            backdrop_alpha: DEFAULT_BACKDROP_ALPHA,
        }
    }

    /// Wrap the content according to this spec.
    pub fn wrapped(&self) -> WrappedText {
        wrap_text(&self.content, self.wrap_width, self.max_lines)
    }
}

/// Result of wrapping a title for display.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedText {
    /// Wrapped lines, each at most the requested width in characters
    pub lines: Vec<String>,
    /// Whether the text was truncated at the line limit
    pub truncated: bool,
}

impl WrappedText {
    /// Width in characters of the longest line.
    pub fn max_line_chars(&self) -> usize {
        self.lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Lines joined with newlines, as drawtext expects.
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

/// Greedily wrap `text` to at most `width` characters per line, keeping
/// at most `max_lines` lines.
///
/// Words longer than `width` are split at the width so no line ever
/// exceeds it. If the wrapped text exceeds `max_lines`, the surplus is
/// dropped and an ellipsis is appended to the last kept line.
pub fn wrap_text(text: &str, width: usize, max_lines: usize) -> WrappedText {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    let mut push_line = |lines: &mut Vec<String>, line: &mut String, chars: &mut usize| {
        if !line.is_empty() {
            lines.push(std::mem::take(line));
            *chars = 0;
        }
    };

    for word in text.split_whitespace() {
        let mut word_chars = word.chars().count();
        let mut word = word;

        // Oversized words are split at the width boundary
        while word_chars > width {
            push_line(&mut lines, &mut current, &mut current_chars);
            let split_at = word
                .char_indices()
                .nth(width)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            lines.push(word[..split_at].to_string());
            word = &word[split_at..];
            word_chars -= width;
        }

        let needed = if current.is_empty() {
            word_chars
        } else {
            current_chars + 1 + word_chars
        };

        if needed > width {
            push_line(&mut lines, &mut current, &mut current_chars);
            current.push_str(word);
            current_chars = word_chars;
        } else {
            if !current.is_empty() {
                current.push(' ');
                current_chars += 1;
            }
            current.push_str(word);
            current_chars += word_chars;
        }
    }
    push_line(&mut lines, &mut current, &mut current_chars);

    let truncated = lines.len() > max_lines;
    if truncated {
        lines.truncate(max_lines.max(1));
        if let Some(last) = lines.last_mut() {
            last.push_str("...");
        }
    }

    WrappedText { lines, truncated }
}
