//! Series retrieval and validation

pub mod fetcher;
pub mod http;
pub mod payload;
pub mod provider;
pub mod schema;

pub use fetcher::{fetch, fetch_with_config, FetchOutcome, SeriesFetcher};
pub use http::{HttpSource, SourceConfig};
pub use provider::{FailureKind, FetchError, FetchWarning, SeriesSource};
pub use schema::{SchemaError, SeriesSchema};
