//! YouTube API error types.

use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors from the YouTube Data API boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected API response: {0}")]
    InvalidResponse(String),

    #[error("No eligible videos found for channel {channel_id}")]
    NoEligibleVideos { channel_id: String },
}

impl ApiError {
    /// Create an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}
