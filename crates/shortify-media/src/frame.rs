//! Vertical framing: trim to the window and compose the clip over a
//! blurred copy of itself scaled to fill the target canvas.

use std::path::Path;
use tracing::info;

use shortify_models::{ClipWindow, EncodingConfig};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::probe::probe_video;

/// Blur strength for the background fill.
const BACKGROUND_BLUR: &str = "boxblur=10:10";

/// Target output dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDims {
    pub width: u32,
    pub height: u32,
}

impl TargetDims {
    /// Create target dimensions, rounding down to even values.
    ///
    /// libx264 requires even frame dimensions; an odd request would fail
    /// deep inside the encoder, so it is corrected here.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width & !1,
            height: height & !1,
        }
    }

    /// Parse a `WxH` string, e.g. `1080x1920`.
    pub fn parse(s: &str) -> Option<Self> {
        let (w, h) = s.split_once('x')?;
        Some(Self::new(w.trim().parse().ok()?, h.trim().parse().ok()?))
    }
}

impl std::fmt::Display for TargetDims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Compute the effective (start, duration) for a source of known length.
///
/// Policy for short sources: if the source is shorter than the requested
/// window length, the clip is used in full from the beginning. Otherwise
/// the window keeps its full length, shifting its start back if it would
/// run past the end of the source.
pub fn effective_window(source_duration: f64, window: ClipWindow) -> (f64, f64) {
    let length = window.length_secs();
    if source_duration <= length {
        return (0.0, source_duration);
    }
    let start = window.start_secs.min(source_duration - length);
    (start, length)
}

/// Build the framing filter graph for the given canvas.
///
/// The background branch is scaled to cover the whole canvas, cropped to
/// it exactly, and blurred; the foreground branch is scaled to fit inside
/// it and overlaid centred. The crop pins the output to exactly
/// `dims.width` x `dims.height`.
pub fn build_frame_filter(dims: TargetDims) -> String {
    let TargetDims { width: w, height: h } = dims;
    format!(
        "[0:v]split=2[bg][fg];\
         [bg]scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h},{BACKGROUND_BLUR}[bgfill];\
         [fg]scale={w}:{h}:force_original_aspect_ratio=decrease:force_divisible_by=2[fgfit];\
         [bgfill][fgfit]overlay=(W-w)/2:(H-h)/2[vout]"
    )
}

/// Trim `input` to the window and frame it on a blurred vertical canvas.
///
/// The output clip has exactly the target dimensions and carries the
/// source audio when present.
pub async fn frame_clip(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    window: ClipWindow,
    dims: TargetDims,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    let info = probe_video(input).await?;
    let (start, duration) = effective_window(info.duration, window);

    info!(
        input = %input.display(),
        start = start,
        duration = duration,
        dims = %dims,
        "Framing clip"
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(start)
        .duration(duration)
        .filter_complex(build_frame_filter(dims))
        .map("[vout]")
        .map("0:a:0?")
        .output_args(encoding.to_ffmpeg_args());

    FfmpegRunner::new().run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: f64, end: f64) -> ClipWindow {
        ClipWindow::new(start, end).unwrap()
    }

    #[test]
    fn test_dims_forced_even() {
        let dims = TargetDims::new(1081, 1919);
        assert_eq!(dims, TargetDims::new(1080, 1918));
    }

    #[test]
    fn test_dims_parse() {
        assert_eq!(
            TargetDims::parse("1080x1920"),
            Some(TargetDims::new(1080, 1920))
        );
        assert!(TargetDims::parse("1080").is_none());
        assert!(TargetDims::parse("wxh").is_none());
    }

    #[test]
    fn test_effective_window_source_long_enough() {
        // 10-minute source, window 02:00-02:45
        let (start, duration) = effective_window(600.0, window(120.0, 165.0));
        assert_eq!(start, 120.0);
        assert_eq!(duration, 45.0);
    }

    #[test]
    fn test_effective_window_short_source_uses_full_clip() {
        let (start, duration) = effective_window(30.0, window(0.0, 55.0));
        assert_eq!(start, 0.0);
        assert_eq!(duration, 30.0);
    }

    #[test]
    fn test_effective_window_shifts_back_near_end() {
        // Window would run past the end; same length, earlier start
        let (start, duration) = effective_window(100.0, window(80.0, 135.0));
        assert_eq!(duration, 55.0);
        assert_eq!(start, 45.0);
    }

    #[test]
    fn test_frame_filter_pins_output_dims() {
        let filter = build_frame_filter(TargetDims::new(1080, 1920));
        assert!(filter.contains("crop=1080:1920"));
        assert!(filter.contains("boxblur"));
        assert!(filter.contains("overlay=(W-w)/2:(H-h)/2"));
        assert!(filter.contains("force_original_aspect_ratio=decrease"));
    }
}
