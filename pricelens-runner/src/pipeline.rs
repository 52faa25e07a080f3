//! Fetch-then-derive entry point used by the rendering/control layer.
//!
//! Given a request (symbol, date strings, feature toggles, optional endpoint
//! override), runs the fetcher and the derivation engine and returns the
//! augmented series. Like the fetcher, this never fails: callers check
//! `is_empty()` and use `status_message()` for what to show the user.

use crate::config::PipelineConfig;
use chrono::{NaiveDate, NaiveDateTime};
use pricelens_core::data::{FetchError, FetchWarning, HttpSource, SeriesFetcher};
use pricelens_core::{derive, CanonicalSeries, FeatureSet};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Request rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },
}

/// Why a pipeline run produced an empty series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineFailure {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Parameters of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub symbol: String,
    pub start_date: String,
    pub end_date: String,
    pub features: FeatureSet,
    /// Overrides the configured base URL for this call only.
    pub source_endpoint: Option<String>,
}

impl SeriesRequest {
    pub fn new(
        symbol: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            features: FeatureSet::empty(),
            source_endpoint: None,
        }
    }

    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.source_endpoint = Some(endpoint.into());
        self
    }

    /// Check required fields and parse the date range.
    pub fn parse_range(&self) -> Result<(NaiveDate, NaiveDate), RequestError> {
        if self.symbol.trim().is_empty() {
            return Err(RequestError::MissingField("symbol"));
        }
        let start = parse_request_date("start date", &self.start_date)?;
        let end = parse_request_date("end date", &self.end_date)?;
        Ok((start, end))
    }
}

fn parse_request_date(field: &'static str, value: &str) -> Result<NaiveDate, RequestError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RequestError::MissingField(field));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| RequestError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    request: SeriesRequest,
    series: CanonicalSeries,
    failure: Option<PipelineFailure>,
    warnings: Vec<FetchWarning>,
}

impl PipelineOutput {
    fn failed(request: &SeriesRequest, failure: PipelineFailure) -> Self {
        Self {
            request: request.clone(),
            series: CanonicalSeries::empty(request.symbol.trim()),
            failure: Some(failure),
            warnings: Vec::new(),
        }
    }

    pub fn request(&self) -> &SeriesRequest {
        &self.request
    }

    pub fn series(&self) -> &CanonicalSeries {
        &self.series
    }

    pub fn into_series(self) -> CanonicalSeries {
        self.series
    }

    pub fn failure(&self) -> Option<&PipelineFailure> {
        self.failure.as_ref()
    }

    pub fn warnings(&self) -> &[FetchWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// User-facing message for an empty result; `None` when data is present.
    pub fn status_message(&self) -> Option<String> {
        if !self.is_empty() {
            return None;
        }
        match &self.failure {
            Some(PipelineFailure::Request(RequestError::MissingField(_))) => Some(
                "Please ensure a stock symbol, start date, and end date are selected.".to_string(),
            ),
            Some(PipelineFailure::Request(err @ RequestError::InvalidDate { .. })) => {
                Some(format!("Error: {err}."))
            }
            _ => Some(format!(
                "Error: No data found for symbol '{}' from {} to {}. \
                 Please check the symbol or try a different range.",
                self.request.symbol.trim(),
                self.request.start_date.trim(),
                self.request.end_date.trim(),
            )),
        }
    }
}

/// Configured fetch-then-derive pipeline.
///
/// Builds its HTTP client once and reuses it for every request, including
/// requests that override the endpoint. Holds no per-request state, so one
/// instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    source: Result<HttpSource, FetchError>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let source = HttpSource::new(&config.source);
        if let Err(err) = &source {
            warn!(%err, "HTTP source unavailable; every request will come back empty");
        }
        Self { config, source }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Request pre-filled with the configured default features.
    pub fn request(
        &self,
        symbol: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> SeriesRequest {
        SeriesRequest::new(symbol, start_date, end_date)
            .with_features(self.config.default_feature_set())
    }

    /// Run fetch then derive for one request.
    #[tracing::instrument(skip(self, request), fields(symbol = %request.symbol))]
    pub fn load(&self, request: &SeriesRequest) -> PipelineOutput {
        let (start, end) = match request.parse_range() {
            Ok(range) => range,
            Err(err) => {
                warn!(%err, "rejecting request");
                return PipelineOutput::failed(request, err.into());
            }
        };

        let source = match (&self.source, &request.source_endpoint) {
            (Ok(source), Some(endpoint)) => source.with_base_url(endpoint),
            (Ok(source), None) => source.clone(),
            (Err(err), _) => return PipelineOutput::failed(request, err.clone().into()),
        };

        let symbol = request.symbol.trim();
        let outcome = SeriesFetcher::new(source).fetch(symbol, start, end);
        let (series, failure, warnings) = outcome.into_parts();

        let series = derive(&series, request.features);
        debug!(
            rows = series.len(),
            derived = series.derived_columns().count(),
            "pipeline finished"
        );

        PipelineOutput {
            request: request.clone(),
            series,
            failure: failure.map(PipelineFailure::from),
            warnings,
        }
    }
}

/// Run the pipeline with the default configuration.
///
/// The default pipeline (and its HTTP client) is built on first use and
/// shared by every later call.
pub fn load_series(request: &SeriesRequest) -> PipelineOutput {
    static DEFAULT: OnceLock<Pipeline> = OnceLock::new();
    DEFAULT.get_or_init(Pipeline::default).load(request)
}
