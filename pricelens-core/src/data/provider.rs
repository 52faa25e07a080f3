//! Source trait and structured failure types for the retrieval path.
//!
//! The SeriesSource trait abstracts over how a raw response body is obtained
//! (HTTP in production, canned bodies in tests) so the validation gates can be
//! exercised without a network.

use crate::domain::PriceField;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Coarse failure taxonomy. Every variant collapses to the empty result for the
/// caller; the kind only matters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureKind {
    /// Unreachable host, timeout, or non-success status.
    Transport,
    /// Body is not valid JSON.
    Decode,
    /// Missing top-level keys or wrongly shaped `data`.
    Schema,
    /// Empty data set, missing column, or unusable dates.
    Content,
}

/// Structured error types for the retrieval path.
///
/// These are designed to be displayable to an end user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("remote rejected the request with HTTP {status}")]
    TransportRejected { status: u16 },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("remote unreachable: {0}")]
    TransportUnreachable(String),

    #[error("response body is not valid JSON: {0}")]
    Decode(String),

    #[error("response does not match the expected schema: {0}")]
    SchemaMismatch(String),

    #[error("no data points returned for the requested range")]
    NoDataPoints,

    #[error("required column '{0}' is missing from every data point")]
    MissingColumn(&'static str),

    #[error("data point {index} has an unusable date: {value}")]
    InvalidDate { index: usize, value: String },

    #[error("date {0} appears more than once")]
    DuplicateDate(NaiveDate),
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::TransportRejected { .. }
            | FetchError::Timeout(_)
            | FetchError::TransportUnreachable(_) => FailureKind::Transport,
            FetchError::Decode(_) => FailureKind::Decode,
            FetchError::SchemaMismatch(_) => FailureKind::Schema,
            FetchError::NoDataPoints
            | FetchError::MissingColumn(_)
            | FetchError::InvalidDate { .. }
            | FetchError::DuplicateDate(_) => FailureKind::Content,
        }
    }
}

/// Non-fatal findings recorded while building a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FetchWarning {
    /// The payload labels itself with a different symbol than requested.
    /// The requested symbol stays authoritative.
    SymbolMismatch { requested: String, returned: String },

    /// Some values could not be coerced (fractional volumes included) and hold
    /// the sentinel.
    UnusableValues { columns: Vec<PriceField>, count: usize },
}

impl std::fmt::Display for FetchWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchWarning::SymbolMismatch {
                requested,
                returned,
            } => write!(
                f,
                "remote returned data for symbol {returned} when {requested} was requested"
            ),
            FetchWarning::UnusableValues { columns, count } => {
                let names: Vec<&str> = columns.iter().map(|c| c.column_name()).collect();
                write!(
                    f,
                    "{count} unusable value(s) replaced with the missing sentinel in {}",
                    names.join(", ")
                )
            }
        }
    }
}

/// Trait for raw series sources.
///
/// Implementations only deliver the response body; decoding and validation
/// happen in the fetcher so every source gets identical gate semantics.
pub trait SeriesSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the raw response body for a symbol over a date range.
    fn fetch_body(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<String, FetchError>;
}
