//! PriceLens Runner — request handling and configuration for the pipeline.
//!
//! This crate builds on `pricelens-core` to provide:
//! - The inbound contract: a series request in, an augmented series out
//! - Request checks (required fields, date strings) before any network call
//! - User-facing status messages for empty results
//! - TOML pipeline configuration (source endpoint, timeout, default features)

pub mod config;
pub mod pipeline;

pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{
    load_series, Pipeline, PipelineFailure, PipelineOutput, RequestError, SeriesRequest,
};
