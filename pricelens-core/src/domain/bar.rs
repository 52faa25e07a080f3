//! PriceBar: one validated trading day of a canonical series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV record after validation and numeric coercion.
///
/// `None` is the missing-numeric sentinel: the source carried the field but its
/// value was not numerically usable. It is never represented as `f64::NAN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
}

impl PriceBar {
    /// Returns true if any OHLCV field holds the sentinel.
    pub fn has_sentinel(&self) -> bool {
        self.open.is_none()
            || self.high.is_none()
            || self.low.is_none()
            || self.close.is_none()
            || self.volume.is_none()
    }

    /// Value of a canonical price column on this bar.
    ///
    /// `Volume` is widened to `f64` so callers can treat every column uniformly.
    pub fn value(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::Volume => self.volume.map(|v| v as f64),
        }
    }
}

/// The five numeric columns of a canonical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceField {
    pub const ALL: [PriceField; 5] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
        PriceField::Volume,
    ];

    /// Canonical column name ("Open", "Close", ...).
    pub fn column_name(self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
            PriceField::Volume => "Volume",
        }
    }

    /// Key the remote payload uses for this field.
    pub fn payload_key(self) -> &'static str {
        match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
            PriceField::Volume => "volume",
        }
    }
}
