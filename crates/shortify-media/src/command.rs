//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// One input file with its per-input arguments (the ones before `-i`).
#[derive(Debug, Clone)]
struct Input {
    path: PathBuf,
    args: Vec<String>,
}

/// Builder for FFmpeg commands.
///
/// Supports multiple inputs so overlay and concat graphs can be built
/// as a single invocation.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    inputs: Vec<Input>,
    output: PathBuf,
    /// Output arguments (after the inputs)
    output_args: Vec<String>,
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command with a single input.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            inputs: vec![Input {
                path: input.as_ref().to_path_buf(),
                args: Vec::new(),
            }],
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            log_level: "error".to_string(),
        }
    }

    /// Add another input file.
    pub fn input(mut self, input: impl AsRef<Path>) -> Self {
        self.inputs.push(Input {
            path: input.as_ref().to_path_buf(),
            args: Vec::new(),
        });
        self
    }

    /// Add an argument before the most recently added input's `-i`.
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        if let Some(last) = self.inputs.last_mut() {
            last.args.push(arg.into());
        }
        self
    }

    /// Add an output argument.
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Seek the most recent input (before `-i`).
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{:.3}", seconds))
    }

    /// Set output duration.
    pub fn duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format!("{:.3}", seconds))
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set filter complex.
    pub fn filter_complex(self, filter: impl Into<String>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    /// Map a stream into the output.
    pub fn map(self, spec: impl Into<String>) -> Self {
        self.output_arg("-map").output_arg(spec)
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-v".to_string(),
            self.log_level.clone(),
            // Progress key=value stream on stderr
            "-progress".to_string(),
            "pipe:2".to_string(),
        ];

        for input in &self.inputs {
            args.extend(input.args.iter().cloned());
            args.push("-i".to_string());
            args.push(input.path.to_string_lossy().to_string());
        }

        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Encode progress parsed from FFmpeg's `-progress` output.
#[derive(Debug, Clone, Default)]
pub struct FfmpegProgress {
    /// Output timestamp in milliseconds
    pub out_time_ms: i64,
    /// Encode speed relative to realtime
    pub speed: f64,
    /// Whether FFmpeg reported `progress=end`
    pub is_complete: bool,
}

/// Runner for FFmpeg commands.
///
/// Invocations block until the encode completes or fails; there is no
/// timeout, matching the rest of the pipeline's synchronous model.
#[derive(Debug, Default)]
pub struct FfmpegRunner;

impl FfmpegRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run an FFmpeg command to completion.
    ///
    /// Progress lines are parsed from stderr and logged at debug level;
    /// non-progress stderr output is retained for the error report.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| MediaError::encode_failed("stderr not captured", None, None))?;
        let mut reader = BufReader::new(stderr).lines();

        let mut progress = FfmpegProgress::default();
        let mut diagnostics: Vec<String> = Vec::new();

        while let Ok(Some(line)) = reader.next_line().await {
            if let Some(update) = parse_progress_line(&line, &mut progress) {
                debug!(
                    out_time_ms = update.out_time_ms,
                    speed = update.speed,
                    "ffmpeg progress"
                );
            } else if !line.trim().is_empty() && !line.contains('=') {
                diagnostics.push(line);
            }
        }

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            let stderr_tail = if diagnostics.is_empty() {
                None
            } else {
                Some(diagnostics.join("\n"))
            };
            Err(MediaError::encode_failed(
                "FFmpeg exited with non-zero status",
                stderr_tail,
                status.code(),
            ))
        }
    }
}

/// Parse a progress line from FFmpeg's `-progress` output.
///
/// Returns an updated snapshot when a `progress=` terminator line is seen.
fn parse_progress_line(line: &str, current: &mut FfmpegProgress) -> Option<FfmpegProgress> {
    let (key, value) = line.trim().split_once('=')?;

    match key {
        "out_time_ms" | "out_time_us" => {
            // Both keys are in microseconds in modern FFmpeg builds
            if let Ok(us) = value.parse::<i64>() {
                current.out_time_ms = us / 1000;
            }
        }
        "speed" => {
            if let Some(speed_str) = value.strip_suffix('x') {
                if let Ok(speed) = speed_str.parse() {
                    current.speed = speed;
                }
            }
        }
        "progress" => {
            if value == "end" {
                current.is_complete = true;
            }
            return Some(current.clone());
        }
        _ => {}
    }

    None
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}

/// Check if yt-dlp is available.
pub fn check_ytdlp() -> MediaResult<PathBuf> {
    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_input_builder() {
        let cmd = FfmpegCommand::new("input.mp4", "output.mp4")
            .seek(10.0)
            .duration(30.0)
            .output_args(["-c:v", "libx264"]);

        let args = cmd.build_args();
        assert!(args.contains(&"-ss".to_string()));
        assert!(args.contains(&"10.000".to_string()));
        assert!(args.contains(&"-t".to_string()));
        assert!(args.contains(&"libx264".to_string()));
        assert_eq!(args.last().unwrap(), "output.mp4");
    }

    #[test]
    fn test_multi_input_order() {
        let cmd = FfmpegCommand::new("a.mp4", "out.mp4")
            .input("b.png")
            .filter_complex("[0:v][1:v]overlay")
            .map("0:a");

        let args = cmd.build_args();
        let first_i = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[first_i + 1], "a.mp4");
        let second_i = args.iter().rposition(|a| a == "-i").unwrap();
        assert_eq!(args[second_i + 1], "b.png");
        // Output args come after all inputs
        assert!(args.iter().position(|a| a == "-filter_complex").unwrap() > second_i);
    }

    #[test]
    fn test_input_arg_applies_to_latest_input() {
        let cmd = FfmpegCommand::new("a.mp4", "out.mp4")
            .input("outro.mp4")
            .input_arg("-f")
            .input_arg("concat");

        let args = cmd.build_args();
        let f_pos = args.iter().position(|a| a == "-f").unwrap();
        // The per-input args precede the second -i
        assert_eq!(args[f_pos + 1], "concat");
        assert_eq!(args[f_pos + 2], "-i");
        assert_eq!(args[f_pos + 3], "outro.mp4");
    }

    #[test]
    fn test_progress_parsing() {
        let mut progress = FfmpegProgress::default();

        assert!(parse_progress_line("out_time_us=5000000", &mut progress).is_none());
        assert_eq!(progress.out_time_ms, 5000);

        parse_progress_line("speed=1.5x", &mut progress);
        assert!((progress.speed - 1.5).abs() < 0.01);

        let snapshot = parse_progress_line("progress=end", &mut progress);
        assert!(snapshot.is_some());
        assert!(progress.is_complete);
    }
}
