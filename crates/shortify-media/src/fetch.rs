//! Source fetching with yt-dlp.
//!
//! The fetcher downloads the best mp4 video-only stream and the best m4a
//! audio-only stream separately, then merges them into a single file with
//! a stream-copy video track and AAC audio. Downloads are not resumable:
//! a failed transfer starts over on the next run.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Format selector for the video-only stream.
const VIDEO_FORMAT: &str = "bestvideo[ext=mp4]/bestvideo";
/// Format selector for the audio-only stream.
const AUDIO_FORMAT: &str = "bestaudio[ext=m4a]/bestaudio";

/// Download a source video into `work_dir` and return the merged file path.
///
/// Writes three files into `work_dir`: the raw video stream, the raw
/// audio stream, and the merged `source.mp4` which is returned. The
/// caller owns `work_dir` and its cleanup.
pub async fn fetch_source(url: &str, work_dir: &Path) -> MediaResult<PathBuf> {
    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

    let video_path = work_dir.join("stream_video.mp4");
    let audio_path = work_dir.join("stream_audio.m4a");
    let merged_path = work_dir.join("source.mp4");

    info!(url = %url, "Downloading source streams");

    download_stream(url, VIDEO_FORMAT, &video_path).await?;
    download_stream(url, AUDIO_FORMAT, &audio_path).await?;

    merge_tracks(&video_path, &audio_path, &merged_path).await?;

    let size = merged_path.metadata()?.len();
    info!(
        output = %merged_path.display(),
        size_mb = size as f64 / (1024.0 * 1024.0),
        "Source downloaded and merged"
    );

    Ok(merged_path)
}

/// Download a single stream with yt-dlp.
async fn download_stream(url: &str, format: &str, output_path: &Path) -> MediaResult<()> {
    let output_path_str = output_path.to_string_lossy();

    debug!(format = format, output = %output_path_str, "Running yt-dlp");

    let output = Command::new("yt-dlp")
        .args([
            "--no-continue",
            "--no-part",
            "--no-playlist",
            "-f",
            format,
            "-o",
            &output_path_str,
            url,
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp stderr: {}", stderr);
        let error_msg = stderr.lines().last().unwrap_or("Unknown error");
        return Err(MediaError::download_failed(format!(
            "yt-dlp failed: {}",
            error_msg
        )));
    }

    if !output_path.exists() {
        return Err(MediaError::download_failed(format!(
            "Stream file not created: {}",
            output_path.display()
        )));
    }

    Ok(())
}

/// Merge separate video and audio tracks into one container.
///
/// The video track is stream-copied; audio is re-encoded to AAC so the
/// container is playable regardless of the source audio codec.
async fn merge_tracks(video: &Path, audio: &Path, output: &Path) -> MediaResult<()> {
    let cmd = FfmpegCommand::new(video, output)
        .input(audio)
        .map("0:v:0")
        .map("1:a:0")
        .output_args(["-c:v", "copy", "-c:a", "aac"]);

    FfmpegRunner::new().run(&cmd).await?;

    if !output.exists() {
        return Err(MediaError::download_failed(format!(
            "Merged file not created: {}",
            output.display()
        )));
    }

    Ok(())
}
