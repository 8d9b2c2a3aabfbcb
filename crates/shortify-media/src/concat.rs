//! Outro concatenation.
//!
//! The outro is scaled to fit the target canvas and padded to it, then
//! joined after the main clip with the concat filter in a single encode.
//! Audio from both parts is resampled to a common rate so the concat
//! filter accepts them regardless of the sources' parameters.

use std::path::Path;
use tracing::info;

use shortify_models::EncodingConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::frame::TargetDims;

/// Common audio sample rate for concatenation.
const CONCAT_SAMPLE_RATE: u32 = 44100;

/// Build the concat filter graph: input 0 is the main clip (already at
/// the target dimensions), input 1 the outro.
pub fn build_concat_filter(dims: TargetDims) -> String {
    let TargetDims { width: w, height: h } = dims;
    format!(
        "[0:v]format=yuv420p[mainv];\
         [1:v]scale={w}:{h}:force_original_aspect_ratio=decrease:force_divisible_by=2,\
         pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,format=yuv420p[outrov];\
         [0:a]aresample={sr},aformat=channel_layouts=stereo[maina];\
         [1:a]aresample={sr},aformat=channel_layouts=stereo[outroa];\
         [mainv][maina][outrov][outroa]concat=n=2:v=1:a=1[v][a]",
        sr = CONCAT_SAMPLE_RATE,
    )
}

/// Append the outro clip after `main_clip`, writing the joined result to
/// `output`.
///
/// The outro path is validated before anything is written, so a missing
/// outro asset fails the run without touching the filesystem.
pub async fn append_outro(
    main_clip: impl AsRef<Path>,
    outro: impl AsRef<Path>,
    output: impl AsRef<Path>,
    dims: TargetDims,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    let main_clip = main_clip.as_ref();
    let outro = outro.as_ref();
    let output = output.as_ref();

    if !outro.exists() {
        return Err(MediaError::FileNotFound(outro.to_path_buf()));
    }
    if !main_clip.exists() {
        return Err(MediaError::FileNotFound(main_clip.to_path_buf()));
    }

    info!(
        main = %main_clip.display(),
        outro = %outro.display(),
        output = %output.display(),
        "Appending outro"
    );

    let cmd = FfmpegCommand::new(main_clip, output)
        .input(outro)
        .filter_complex(build_concat_filter(dims))
        .map("[v]")
        .map("[a]")
        .output_args(encoding.to_ffmpeg_args());

    FfmpegRunner::new().run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_filter_normalizes_outro() {
        let filter = build_concat_filter(TargetDims::new(1080, 1920));
        assert!(filter.contains("scale=1080:1920"));
        assert!(filter.contains("pad=1080:1920"));
        assert!(filter.contains("concat=n=2:v=1:a=1"));
        assert!(filter.contains("aresample=44100"));
    }

    #[tokio::test]
    async fn test_missing_outro_fails_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let main_clip = dir.path().join("main.mp4");
        std::fs::write(&main_clip, b"stub").unwrap();
        let output = dir.path().join("final.mp4");

        let err = append_outro(
            &main_clip,
            Path::new("/nonexistent/outro.mp4"),
            &output,
            TargetDims::new(1080, 1920),
            &EncodingConfig::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MediaError::FileNotFound(p) if p.ends_with("outro.mp4")));
        assert!(!output.exists());
    }
}
