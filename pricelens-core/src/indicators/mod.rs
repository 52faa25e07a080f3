//! Derived-column indicators.
//!
//! Indicators are pure functions: bar history in, one value per bar out. Every
//! window is measured in rows, not calendar days, and uses a minimum window of
//! one row so partial windows at the series start still produce values.
//!
//! `None` is the missing-numeric sentinel throughout. Sentinel inputs are
//! skipped inside a window rather than poisoning it.

pub mod daily_return;
pub mod rolling;
pub mod sma;
pub mod volatility;

pub use daily_return::DailyReturn;
pub use sma::Sma;
pub use volatility::Volatility;

use crate::domain::{DerivedColumn, PriceBar};

/// Trait for indicators that produce a derived column.
///
/// # Look-ahead contamination guard
/// No value at row t may depend on data from row t+1 or later.
pub trait Indicator: Send + Sync {
    /// Column this indicator fills.
    fn column(&self) -> DerivedColumn;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns one value per bar.
    fn compute(&self, bars: &[PriceBar]) -> Vec<Option<f64>>;
}

/// Create bars from close prices for testing.
///
/// OHL mirror the close, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[Option<f64>]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: base_date + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: Some(1000),
        })
        .collect()
}

/// Bars from plain closes, no sentinels.
#[cfg(test)]
pub fn make_close_bars(closes: &[f64]) -> Vec<PriceBar> {
    let wrapped: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
    make_bars(&wrapped)
}

/// Assert an optional value is present and approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: Option<f64>, expected: f64, epsilon: f64) {
    let actual = actual.unwrap_or_else(|| panic!("expected {expected}, got the sentinel"));
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
