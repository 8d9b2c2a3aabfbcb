//! The end-to-end run: select a source, fetch it, frame it, annotate
//! it, append the outro, and move the finished artifact into place.
//!
//! All intermediate files live in a temp directory that is removed when
//! the run ends, success or failure. Only the final move touches the
//! output directory, so a failed run never leaves a partial artifact.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::info;

use shortify_media::{
    annotate_clip, append_outro, fetch_source, frame_clip, move_file, AnnotateOptions,
    WatermarkSpec,
};
use shortify_models::{EncodingConfig, TextSpec, VideoSource};
use shortify_youtube::{select_recent_upload, YouTubeClient};

use crate::config::ShortifyConfig;
use crate::error::PipelineResult;

/// Run the whole pipeline once and return the final artifact path.
pub async fn run_pipeline(config: &ShortifyConfig) -> PipelineResult<PathBuf> {
    let client = YouTubeClient::new(&config.api_key);
    let source = select_recent_upload(&client, &config.channel_id, config.min_source_secs).await?;

    let work_dir = TempDir::new()?;
    let work = work_dir.path();

    let source_path = fetch_source(&source.watch_url(), work).await?;

    let encoding = EncodingConfig::default();

    let framed_path = work.join("framed.mp4");
    frame_clip(
        &source_path,
        &framed_path,
        config.window,
        config.target_dims,
        &encoding,
    )
    .await?;

    let options = AnnotateOptions {
        text: TextSpec::new(&source.title, &config.font_path),
        watermark: config.logo_path.as_ref().map(WatermarkSpec::new),
    };
    let annotated_path = work.join("annotated.mp4");
    annotate_clip(
        &framed_path,
        &annotated_path,
        &options,
        config.target_dims,
        &encoding,
        work,
    )
    .await?;

    let finished_path = work.join("final.mp4");
    append_outro(
        &annotated_path,
        &config.outro_path,
        &finished_path,
        config.target_dims,
        &encoding,
    )
    .await?;

    let artifact_path = config.output_dir.join(artifact_name(&source));
    move_file(&finished_path, &artifact_path).await?;

    info!(
        video_id = %source.id,
        artifact = %artifact_path.display(),
        "Pipeline complete"
    );

    Ok(artifact_path)
}

/// Build the artifact filename from the source's title and id.
fn artifact_name(source: &VideoSource) -> String {
    format!("{}_{}_short.mp4", source.sanitized_title(), source.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name() {
        let source = VideoSource {
            id: "abc123".to_string(),
            title: "My Great Video!".to_string(),
            duration_secs: 300.0,
        };
        assert_eq!(artifact_name(&source), "My_Great_Video_abc123_short.mp4");
    }

    #[test]
    fn test_artifact_name_falls_back_to_id() {
        let source = VideoSource {
            id: "abc123".to_string(),
            title: "!!!".to_string(),
            duration_secs: 300.0,
        };
        assert_eq!(artifact_name(&source), "abc123_abc123_short.mp4");
    }
}
