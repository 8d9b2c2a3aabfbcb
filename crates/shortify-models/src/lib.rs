//! Shared data models for the Shortify pipeline.
//!
//! This crate provides the plain-data types the pipeline crates share:
//! - Timestamps and the configured trim window
//! - ISO-8601 duration parsing (YouTube `contentDetails.duration`)
//! - Encoding configuration
//! - Source video metadata
//! - Title overlay configuration and word wrapping

pub mod duration;
pub mod encoding;
pub mod text;
pub mod timestamp;
pub mod video;

// Re-export common types
pub use duration::{parse_iso8601_duration, DurationError};
pub use encoding::EncodingConfig;
pub use text::{wrap_text, TextSpec, WrappedText};
pub use timestamp::{format_seconds, parse_timestamp, ClipWindow, TimestampError};
pub use video::VideoSource;
