//! Title and watermark annotation.
//!
//! The title block is a rounded-rectangle backdrop rendered as an RGBA
//! PNG (with the `image` crate) and overlaid top-centre, with the wrapped
//! title drawn over it line by line via `drawtext`. The watermark is an
//! optional image overlaid bottom-right at reduced opacity, either for
//! the whole clip or for a given time range.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use tracing::info;

use shortify_models::{EncodingConfig, TextSpec, WrappedText};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::frame::TargetDims;

/// Vertical offset of the title backdrop from the top of the frame.
const TITLE_TOP_MARGIN_PX: u32 = 60;

/// Estimated glyph advance as a fraction of the font size (3/5).
/// Good enough for backdrop sizing; drawtext centres the real text itself.
const GLYPH_ADVANCE_NUM: u32 = 3;
const GLYPH_ADVANCE_DEN: u32 = 5;

/// Line height as a fraction of the font size (5/4).
const LINE_HEIGHT_NUM: u32 = 5;
const LINE_HEIGHT_DEN: u32 = 4;

/// Watermark overlay configuration.
#[derive(Debug, Clone)]
pub struct WatermarkSpec {
    /// Path to the watermark image (PNG with transparency)
    pub image_path: PathBuf,
    /// Height the watermark is scaled to, in pixels
    pub height_px: u32,
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
    /// Offset from the bottom-right corner, in pixels
    pub offset_x: u32,
    pub offset_y: u32,
    /// Optional (start, end) visibility range in seconds;
    /// `None` keeps the watermark for the clip's full duration.
    pub time_range: Option<(f64, f64)>,
}

impl WatermarkSpec {
    /// Create a spec with default placement for a logo image.
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
            height_px: 100,
            opacity: 0.5,
            offset_x: 20,
            offset_y: 20,
            time_range: None,
        }
    }

    /// Restrict the watermark to a time range.
    pub fn with_time_range(mut self, start_secs: f64, end_secs: f64) -> Self {
        self.time_range = Some((start_secs, end_secs));
        self
    }
}

/// Annotation inputs for one clip.
#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    pub text: TextSpec,
    pub watermark: Option<WatermarkSpec>,
}

/// Computed overlay placement.
///
/// A pure function of the text spec and the frame dimensions, so two runs
/// with identical inputs place every element at identical coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLayout {
    pub backdrop_w: u32,
    pub backdrop_h: u32,
    pub backdrop_x: u32,
    pub backdrop_y: u32,
    /// y of the first text line
    pub text_top: u32,
    pub line_height: u32,
}

impl OverlayLayout {
    /// Compute the layout for wrapped text on a canvas.
    pub fn compute(spec: &TextSpec, wrapped: &WrappedText, dims: TargetDims) -> Self {
        let glyph_w = spec.font_size * GLYPH_ADVANCE_NUM / GLYPH_ADVANCE_DEN;
        let line_height = spec.font_size * LINE_HEIGHT_NUM / LINE_HEIGHT_DEN;

        let text_w = wrapped.max_line_chars() as u32 * glyph_w;
        let text_h = wrapped.lines.len() as u32 * line_height;

        let backdrop_w = (text_w + 2 * spec.padding_px).min(dims.width);
        let backdrop_h = text_h + 2 * spec.padding_px;
        let backdrop_x = (dims.width - backdrop_w) / 2;
        let backdrop_y = TITLE_TOP_MARGIN_PX;

        Self {
            backdrop_w,
            backdrop_h,
            backdrop_x,
            backdrop_y,
            text_top: backdrop_y + spec.padding_px,
            line_height,
        }
    }
}

/// Render the rounded-rectangle backdrop as an RGBA image.
pub fn render_backdrop(layout: &OverlayLayout, corner_radius: u32, alpha: u8) -> RgbaImage {
    let (w, h) = (layout.backdrop_w.max(1), layout.backdrop_h.max(1));
    let radius = corner_radius.min(w / 2).min(h / 2) as i64;
    let fill = Rgba([0u8, 0, 0, alpha]);
    let clear = Rgba([0u8, 0, 0, 0]);

    RgbaImage::from_fn(w, h, |x, y| {
        let x = x as i64;
        let y = y as i64;
        // Nearest corner-circle centre; pixels outside its radius are
        // transparent, everything else is the fill.
        let cx = x.clamp(radius, w as i64 - 1 - radius);
        let cy = y.clamp(radius, h as i64 - 1 - radius);
        let dx = x - cx;
        let dy = y - cy;
        if dx * dx + dy * dy > radius * radius {
            clear
        } else {
            fill
        }
    })
}

/// Escape a value for use inside a quoted ffmpeg filter parameter.
fn escape_filter_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
}

/// Build the drawtext chain for the wrapped title lines.
///
/// Each line gets its own centred drawtext so every line is horizontally
/// centred independently, matching caption-style titles.
fn build_drawtext_chain(
    spec: &TextSpec,
    wrapped: &WrappedText,
    layout: &OverlayLayout,
    input_label: &str,
) -> (String, String) {
    let font = escape_filter_value(&spec.font_path.to_string_lossy());
    let mut chains = Vec::new();
    let mut label = input_label.to_string();

    for (i, line) in wrapped.lines.iter().enumerate() {
        let next = format!("txt{}", i);
        let y = layout.text_top + i as u32 * layout.line_height;
        chains.push(format!(
            "[{label}]drawtext=fontfile='{font}':text='{text}':fontcolor=white:\
             fontsize={size}:x=(w-text_w)/2:y={y}[{next}]",
            text = escape_filter_value(line),
            size = spec.font_size,
        ));
        label = next;
    }

    (chains.join(";"), label)
}

/// Build the watermark overlay step reading from ffmpeg input `index`.
fn build_watermark_chain(spec: &WatermarkSpec, index: usize, input_label: &str) -> (String, String) {
    let enable = match spec.time_range {
        Some((start, end)) => format!(":enable='between(t,{:.3},{:.3})'", start, end),
        None => String::new(),
    };
    let chain = format!(
        "[{index}:v]format=rgba,colorchannelmixer=aa={opacity:.2},scale=-1:{height}[wm];\
         [{input_label}][wm]overlay=W-w-{x}:H-h-{y}:format=auto{enable}[wmout]",
        opacity = spec.opacity.clamp(0.0, 1.0),
        height = spec.height_px,
        x = spec.offset_x,
        y = spec.offset_y,
    );
    (chain, "wmout".to_string())
}

/// Build the full annotation filter graph.
///
/// Input 0 is the framed clip, input 1 the rendered backdrop, and input 2
/// (when present) the watermark image.
pub fn build_annotate_filter(
    spec: &TextSpec,
    wrapped: &WrappedText,
    layout: &OverlayLayout,
    watermark: Option<&WatermarkSpec>,
) -> String {
    let mut chains = Vec::new();

    chains.push(format!(
        "[0:v][1:v]overlay={}:{}[titled]",
        layout.backdrop_x, layout.backdrop_y
    ));
    let (text_chain, mut label) = build_drawtext_chain(spec, wrapped, layout, "titled");
    if !text_chain.is_empty() {
        chains.push(text_chain);
    }

    if let Some(wm) = watermark {
        let (wm_chain, wm_label) = build_watermark_chain(wm, 2, &label);
        chains.push(wm_chain);
        label = wm_label;
    }

    // Rename the final label so callers can map it uniformly
    chains.push(format!("[{label}]null[vout]"));
    chains.join(";")
}

/// Composite the title block and watermark onto a framed clip.
///
/// The backdrop PNG is written into `work_dir`; the output clip keeps the
/// input audio via stream copy.
pub async fn annotate_clip(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &AnnotateOptions,
    dims: TargetDims,
    encoding: &EncodingConfig,
    work_dir: &Path,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !options.text.font_path.exists() {
        return Err(MediaError::FileNotFound(options.text.font_path.clone()));
    }
    if let Some(wm) = &options.watermark {
        if !wm.image_path.exists() {
            return Err(MediaError::FileNotFound(wm.image_path.clone()));
        }
    }

    let wrapped = options.text.wrapped();
    let layout = OverlayLayout::compute(&options.text, &wrapped, dims);

    let backdrop = render_backdrop(
        &layout,
        options.text.corner_radius_px,
        options.text.backdrop_alpha,
    );
    let backdrop_path = work_dir.join("title_backdrop.png");
    backdrop.save(&backdrop_path)?;

    info!(
        input = %input.display(),
        lines = wrapped.lines.len(),
        watermark = options.watermark.is_some(),
        "Annotating clip"
    );

    let filter = build_annotate_filter(
        &options.text,
        &wrapped,
        &layout,
        options.watermark.as_ref(),
    );

    let mut cmd = FfmpegCommand::new(input, output).input(&backdrop_path);
    if let Some(wm) = &options.watermark {
        cmd = cmd.input(&wm.image_path);
    }
    let crf = encoding.crf.to_string();
    let fps = encoding.fps.to_string();
    let cmd = cmd
        .filter_complex(filter)
        .map("[vout]")
        .map("0:a:0?")
        .output_args([
            "-c:v",
            encoding.codec.as_str(),
            "-preset",
            encoding.preset.as_str(),
            "-crf",
            crf.as_str(),
            "-r",
            fps.as_str(),
            "-c:a",
            "copy",
        ]);

    FfmpegRunner::new().run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(content: &str) -> TextSpec {
        TextSpec::new(content, "/tmp/font.ttf")
    }

    fn dims() -> TargetDims {
        TargetDims::new(1080, 1920)
    }

    #[test]
    fn test_layout_is_deterministic() {
        let s = spec("A reasonably long video title for the overlay");
        let wrapped = s.wrapped();
        let a = OverlayLayout::compute(&s, &wrapped, dims());
        let b = OverlayLayout::compute(&s, &wrapped, dims());
        assert_eq!(a, b);
    }

    #[test]
    fn test_layout_centres_backdrop() {
        let s = spec("Short title");
        let wrapped = s.wrapped();
        let layout = OverlayLayout::compute(&s, &wrapped, dims());
        // Centred within one pixel of rounding
        let right_gap = dims().width - layout.backdrop_x - layout.backdrop_w;
        assert!(layout.backdrop_x.abs_diff(right_gap) <= 1);
        assert!(layout.backdrop_w <= dims().width);
    }

    #[test]
    fn test_backdrop_corners_transparent_centre_filled() {
        let s = spec("Title");
        let wrapped = s.wrapped();
        let layout = OverlayLayout::compute(&s, &wrapped, dims());
        let img = render_backdrop(&layout, 15, 160);

        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(
            img.get_pixel(img.width() - 1, img.height() - 1)[3],
            0
        );
        assert_eq!(img.get_pixel(img.width() / 2, img.height() / 2)[3], 160);
    }

    #[test]
    fn test_escape_filter_value() {
        assert_eq!(escape_filter_value("it's: a\\b"), "it\\'s\\: a\\\\b");
    }

    #[test]
    fn test_filter_one_drawtext_per_line() {
        let s = spec("one two three four five six seven eight nine ten");
        let wrapped = s.wrapped();
        let layout = OverlayLayout::compute(&s, &wrapped, dims());
        let filter = build_annotate_filter(&s, &wrapped, &layout, None);
        assert_eq!(
            filter.matches("drawtext").count(),
            wrapped.lines.len()
        );
        assert!(filter.ends_with("[vout]"));
    }

    #[test]
    fn test_filter_watermark_time_range() {
        let s = spec("Title");
        let wrapped = s.wrapped();
        let layout = OverlayLayout::compute(&s, &wrapped, dims());
        let wm = WatermarkSpec::new("/tmp/logo.png").with_time_range(1.0, 10.0);
        let filter = build_annotate_filter(&s, &wrapped, &layout, Some(&wm));
        assert!(filter.contains("colorchannelmixer=aa=0.50"));
        assert!(filter.contains("enable='between(t,1.000,10.000)'"));
        assert!(filter.contains("overlay=W-w-20:H-h-20"));
    }

    #[test]
    fn test_filter_without_watermark_has_no_overlay_corner() {
        let s = spec("Title");
        let wrapped = s.wrapped();
        let layout = OverlayLayout::compute(&s, &wrapped, dims());
        let filter = build_annotate_filter(&s, &wrapped, &layout, None);
        assert!(!filter.contains("W-w-"));
    }

    #[tokio::test]
    async fn test_missing_watermark_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("font.ttf");
        std::fs::write(&font, b"stub").unwrap();

        let options = AnnotateOptions {
            text: TextSpec::new("Title", &font),
            watermark: Some(WatermarkSpec::new("/nonexistent/logo.png")),
        };
        let err = annotate_clip(
            dir.path().join("in.mp4"),
            dir.path().join("out.mp4"),
            &options,
            dims(),
            &EncodingConfig::default(),
            dir.path(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
