//! HTTP series source.
//!
//! Issues a single blocking GET per fetch against
//! `{base_url}/data/stock/{symbol}?from=YYYY-MM-DD&to=YYYY-MM-DD` with a bounded
//! timeout. No retries: retry policy belongs to the caller.

use super::provider::{FetchError, SeriesSource};
use chrono::NaiveDate;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where and how to reach the remote data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the data API, without a trailing path.
    pub base_url: String,
    /// Upper bound on the whole request, connect through body read.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SourceConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Blocking HTTP implementation of [`SeriesSource`].
///
/// The client is built once; [`HttpSource::with_base_url`] shares it with a
/// source pointed at another endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        Self::with_timeout(&config.base_url, config.timeout())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::TransportUnreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Same client and timeout, different endpoint.
    pub fn with_base_url(&self, base_url: &str) -> Self {
        Self {
            client: self.client.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the series URL for a symbol and date range.
    ///
    /// The symbol is a single percent-encoded path segment, so `/`, `?` and `#`
    /// in it cannot alter the path or the query.
    pub fn series_url(
        base_url: &str,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Url, FetchError> {
        let mut url = Url::parse(base_url)
            .map_err(|e| FetchError::TransportUnreachable(format!("invalid base URL '{base_url}': {e}")))?;
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::TransportUnreachable(format!("base URL '{base_url}' cannot carry a path"))
            })?
            .pop_if_empty()
            .extend(["data", "stock", symbol]);
        url.query_pairs_mut()
            .append_pair("from", &start.format("%Y-%m-%d").to_string())
            .append_pair("to", &end.format("%Y-%m-%d").to_string());
        Ok(url)
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(format!("no response within {}s", self.timeout.as_secs()))
        } else {
            FetchError::TransportUnreachable(e.to_string())
        }
    }
}

impl SeriesSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch_body(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String, FetchError> {
        let url = Self::series_url(&self.base_url, symbol, start, end)?;
        debug!(%url, "requesting series");

        let resp = self.client.get(url).send().map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::TransportRejected {
                status: status.as_u16(),
            });
        }

        resp.text().map_err(|e| self.classify(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn series_url_layout() {
        let url = HttpSource::series_url(
            "http://mockapi.com",
            "TEST",
            date(2024, 1, 1),
            date(2024, 1, 2),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "http://mockapi.com/data/stock/TEST?from=2024-01-01&to=2024-01-02"
        );
    }

    #[test]
    fn series_url_tolerates_trailing_slash() {
        let url = HttpSource::series_url("http://mockapi.com/", "MSFT", date(2023, 1, 1), date(2023, 1, 31))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://mockapi.com/data/stock/MSFT?from=2023-01-01&to=2023-01-31"
        );
    }

    #[test]
    fn default_config_points_at_localhost() {
        let cfg = SourceConfig::default();
        assert_eq!(cfg.base_url, "http://localhost:8000");
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn source_keeps_normalized_base_url() {
        let source = HttpSource::new(&SourceConfig::default().with_base_url("http://x.test/")).unwrap();
        assert_eq!(source.base_url(), "http://x.test");
        assert_eq!(source.name(), "http");
    }

    #[test]
    fn series_url_encodes_symbol_as_one_segment() {
        let url = HttpSource::series_url("http://mockapi.com", "A#B?x/y", date(2024, 1, 1), date(2024, 1, 2))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://mockapi.com/data/stock/A%23B%3Fx%2Fy?from=2024-01-01&to=2024-01-02"
        );
        assert_eq!(url.fragment(), None);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("from".to_string(), "2024-01-01".to_string()),
                ("to".to_string(), "2024-01-02".to_string()),
            ]
        );
    }

    #[test]
    fn series_url_keeps_base_path_prefix() {
        let url = HttpSource::series_url("http://mockapi.com/api/", "IBM", date(2024, 1, 1), date(2024, 1, 2))
            .unwrap();
        assert_eq!(url.path(), "/api/data/stock/IBM");
    }

    #[test]
    fn series_url_rejects_unparseable_base() {
        let err = HttpSource::series_url("not a url", "IBM", date(2024, 1, 1), date(2024, 1, 2))
            .unwrap_err();
        assert!(matches!(err, FetchError::TransportUnreachable(_)));
    }

    #[test]
    fn with_base_url_keeps_timeout() {
        let source = HttpSource::new(&SourceConfig {
            base_url: "http://a.test".into(),
            timeout_secs: 3,
        })
        .unwrap();
        let other = source.with_base_url("http://b.test/");
        assert_eq!(other.base_url(), "http://b.test");
        assert_eq!(other.timeout, Duration::from_secs(3));
    }
}
