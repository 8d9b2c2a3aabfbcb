//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Any failure aborts the run: there is no retry, no partial-output
/// salvage, and no resumability across invocations.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("API error: {0}")]
    Api(#[from] shortify_youtube::ApiError),

    #[error("Media error: {0}")]
    Media(#[from] shortify_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
