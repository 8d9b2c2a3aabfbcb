//! FFmpeg and yt-dlp CLI wrapper for the Shortify pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with progress parsing
//! - FFprobe metadata lookup
//! - Source fetching (yt-dlp stream download + track merge)
//! - Vertical framing with blurred background fill
//! - Title and watermark annotation
//! - Outro concatenation and final artifact placement

pub mod annotate;
pub mod command;
pub mod concat;
pub mod error;
pub mod fetch;
pub mod frame;
pub mod fs_utils;
pub mod probe;

pub use annotate::{annotate_clip, AnnotateOptions, OverlayLayout, WatermarkSpec};
pub use command::{check_ffmpeg, check_ffprobe, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use concat::append_outro;
pub use error::{MediaError, MediaResult};
pub use fetch::fetch_source;
pub use frame::{effective_window, frame_clip, TargetDims};
pub use fs_utils::move_file;
pub use probe::{probe_video, VideoInfo};
