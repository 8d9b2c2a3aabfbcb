//! YouTube Data API v3 client and source selection.
//!
//! Provides the pipeline's source selector: list a channel's recent
//! uploads, look up their durations, and pick one at random among the
//! videos long enough to clip.

pub mod client;
pub mod error;
pub mod select;

pub use client::YouTubeClient;
pub use error::{ApiError, ApiResult};
pub use select::{select_recent_upload, select_source};
