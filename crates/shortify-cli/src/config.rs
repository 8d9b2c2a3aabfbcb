//! Environment-driven configuration.
//!
//! All knobs are read once at startup. Missing required variables fail
//! fast with the variable name in the error, before any network or
//! filesystem work starts.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use shortify_media::TargetDims;
use shortify_models::ClipWindow;

const DEFAULT_OUTPUT_DIR: &str = "./ShortifiedVideos";
const DEFAULT_OUTRO_PATH: &str = "./assets/outro.mp4";
const DEFAULT_FONT_PATH: &str = "./fonts/Luciole-Regular.ttf";
const DEFAULT_TARGET_DIMS: &str = "1080x1920";
const DEFAULT_WINDOW: &str = "00:00:00-00:00:55";
const DEFAULT_MIN_SOURCE_SECS: f64 = 120.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidVar {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct ShortifyConfig {
    /// YouTube Data API key.
    pub api_key: String,
    /// Channel whose uploads are candidates.
    pub channel_id: String,
    /// Directory the final artifact is moved into.
    pub output_dir: PathBuf,
    /// Watermark image; `None` disables the watermark.
    pub logo_path: Option<PathBuf>,
    /// Outro clip appended after the annotated segment.
    pub outro_path: PathBuf,
    /// TTF font used for the title overlay.
    pub font_path: PathBuf,
    /// Output canvas dimensions.
    pub target_dims: TargetDims,
    /// Requested clip window within the source.
    pub window: ClipWindow,
    /// Uploads shorter than this are never selected.
    pub min_source_secs: f64,
}

impl ShortifyConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require_var("YOUTUBE_API_KEY")?;
        let channel_id = require_var("CHANNEL_ID_YOUTUBE")?;

        let output_dir =
            PathBuf::from(optional_var("SHORTIFY_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()));
        let logo_path = optional_var("SHORTIFY_LOGO_PATH").map(PathBuf::from);
        let outro_path =
            PathBuf::from(optional_var("SHORTIFY_OUTRO_PATH").unwrap_or_else(|| DEFAULT_OUTRO_PATH.to_string()));
        let font_path =
            PathBuf::from(optional_var("SHORTIFY_FONT_PATH").unwrap_or_else(|| DEFAULT_FONT_PATH.to_string()));

        let dims_raw = optional_var("SHORTIFY_TARGET_DIMS").unwrap_or_else(|| DEFAULT_TARGET_DIMS.to_string());
        let target_dims = TargetDims::parse(&dims_raw).ok_or_else(|| ConfigError::InvalidVar {
            var: "SHORTIFY_TARGET_DIMS",
            value: dims_raw.clone(),
            reason: "expected WIDTHxHEIGHT, e.g. 1080x1920".to_string(),
        })?;

        let window_raw = optional_var("SHORTIFY_WINDOW").unwrap_or_else(|| DEFAULT_WINDOW.to_string());
        let window = ClipWindow::parse(&window_raw).map_err(|e| ConfigError::InvalidVar {
            var: "SHORTIFY_WINDOW",
            value: window_raw.clone(),
            reason: e.to_string(),
        })?;

        let min_source_secs = match optional_var("SHORTIFY_MIN_SOURCE_SECS") {
            Some(raw) => raw.parse::<f64>().map_err(|e| ConfigError::InvalidVar {
                var: "SHORTIFY_MIN_SOURCE_SECS",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_MIN_SOURCE_SECS,
        };

        Ok(Self {
            api_key,
            channel_id,
            output_dir,
            logo_path,
            outro_path,
            font_path,
            target_dims,
            window,
            min_source_secs,
        })
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    optional_var(name).ok_or(ConfigError::MissingVar(name))
}

/// Read a variable, treating unset and empty identically.
fn optional_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}
