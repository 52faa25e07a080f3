//! PriceLens Core — price series retrieval, validation, and derived metrics.
//!
//! This crate contains the pipeline behind the price dashboard:
//! - Domain types (price bars, canonical series, derived columns)
//! - Series fetcher: one HTTP request, staged validation, fail-soft results
//! - Metric derivation: moving averages, daily returns, rolling volatility
//! - Canonical DataFrame schema and export

pub mod data;
pub mod derive;
pub mod domain;
pub mod indicators;

pub use data::{fetch, FetchError, FetchOutcome, FetchWarning, SeriesFetcher, SourceConfig};
pub use derive::{derive, FeatureSet};
pub use domain::{CanonicalSeries, DerivedColumn, PriceBar, PriceField};
