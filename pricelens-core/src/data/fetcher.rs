//! Series fetcher: one request, one validated series, never an error.
//!
//! Every failure path resolves to the empty series with a recorded reason. The
//! caller always receives something renderable and checks `is_empty()` (or
//! `failure()`) to tell "no data" from "data present".

use super::http::{HttpSource, SourceConfig};
use super::payload;
use super::provider::{FailureKind, FetchError, FetchWarning, SeriesSource};
use crate::domain::CanonicalSeries;
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Result of a fetch: the series (empty on failure) plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    series: CanonicalSeries,
    failure: Option<FetchError>,
    warnings: Vec<FetchWarning>,
}

impl FetchOutcome {
    /// Empty result for `symbol` with the reason it is empty.
    pub fn failed(symbol: &str, error: FetchError) -> Self {
        Self {
            series: CanonicalSeries::empty(symbol),
            failure: Some(error),
            warnings: Vec::new(),
        }
    }

    pub fn series(&self) -> &CanonicalSeries {
        &self.series
    }

    pub fn into_series(self) -> CanonicalSeries {
        self.series
    }

    /// Why the series is empty, if it failed.
    pub fn failure(&self) -> Option<&FetchError> {
        self.failure.as_ref()
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(FetchError::kind)
    }

    pub fn warnings(&self) -> &[FetchWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn into_parts(self) -> (CanonicalSeries, Option<FetchError>, Vec<FetchWarning>) {
        (self.series, self.failure, self.warnings)
    }
}

/// Runs a [`SeriesSource`] through the validation gates.
///
/// Holds no mutable state: one fetcher can serve concurrent callers, and each
/// call gets its own series.
pub struct SeriesFetcher<S> {
    source: S,
}

impl<S: SeriesSource> SeriesFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and validate one symbol over a date range.
    #[tracing::instrument(skip(self), fields(source = self.source.name()))]
    pub fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> FetchOutcome {
        let mut warnings = Vec::new();
        let result = self
            .source
            .fetch_body(symbol, start, end)
            .and_then(|body| payload::parse_series(symbol, &body, &mut warnings));

        match result {
            Ok(series) => {
                debug!(rows = series.len(), "series validated");
                FetchOutcome {
                    series,
                    failure: None,
                    warnings,
                }
            }
            Err(error) => {
                warn!(kind = ?error.kind(), %error, "returning empty series");
                FetchOutcome {
                    series: CanonicalSeries::empty(symbol),
                    failure: Some(error),
                    warnings,
                }
            }
        }
    }
}

/// Fetch over HTTP from `source_endpoint` with the default 10s timeout.
pub fn fetch(symbol: &str, start: NaiveDate, end: NaiveDate, source_endpoint: &str) -> FetchOutcome {
    let config = SourceConfig::default().with_base_url(source_endpoint);
    fetch_with_config(symbol, start, end, &config)
}

/// Fetch over HTTP using an explicit source configuration.
///
/// Builds a client for this one call; long-lived callers should hold an
/// [`HttpSource`] and reuse it through [`SeriesFetcher`].
pub fn fetch_with_config(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    config: &SourceConfig,
) -> FetchOutcome {
    match HttpSource::new(config) {
        Ok(source) => SeriesFetcher::new(source).fetch(symbol, start, end),
        Err(error) => {
            warn!(%error, "could not build HTTP source");
            FetchOutcome::failed(symbol, error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Source that returns a canned body or error.
    struct CannedSource(Result<String, FetchError>);

    impl SeriesSource for CannedSource {
        fn name(&self) -> &str {
            "canned"
        }

        fn fetch_body(&self, _: &str, _: NaiveDate, _: NaiveDate) -> Result<String, FetchError> {
            self.0.clone()
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn fetch_canned(body: Result<String, FetchError>) -> FetchOutcome {
        SeriesFetcher::new(CannedSource(body)).fetch("TEST", day(1), day(2))
    }

    #[test]
    fn successful_fetch_has_no_failure() {
        let body = json!({
            "symbol": "TEST",
            "data": [{"date": "2024-01-01", "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5, "volume": 10}]
        });
        let outcome = fetch_canned(Ok(body.to_string()));
        assert!(!outcome.is_empty());
        assert!(outcome.failure().is_none());
        assert_eq!(outcome.series().len(), 1);
    }

    #[test]
    fn transport_error_becomes_empty_series() {
        let outcome = fetch_canned(Err(FetchError::TransportRejected { status: 404 }));
        assert!(outcome.is_empty());
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Transport));
        assert_eq!(outcome.series().symbol(), "TEST");
    }

    #[test]
    fn decode_error_becomes_empty_series() {
        let outcome = fetch_canned(Ok("not json".into()));
        assert!(outcome.is_empty());
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Decode));
    }

    #[test]
    fn warnings_survive_a_later_failure() {
        let body = json!({"symbol": "OTHER", "data": []});
        let outcome = fetch_canned(Ok(body.to_string()));
        assert!(outcome.is_empty());
        assert_eq!(outcome.failure(), Some(&FetchError::NoDataPoints));
        assert_eq!(outcome.warnings().len(), 1);
    }

    #[test]
    fn unreachable_endpoint_is_soft_failure() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let outcome = fetch("TEST", day(1), day(2), "http://127.0.0.1:9");
        assert!(outcome.is_empty());
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Transport));
    }
}
