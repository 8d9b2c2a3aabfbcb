//! Shortify pipeline: configuration, error aggregation, and the
//! five-stage run (select, fetch, frame, annotate, finish).

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::{ConfigError, ShortifyConfig};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::run_pipeline;
