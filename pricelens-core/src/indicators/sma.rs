//! Simple Moving Average (SMA) of close.
//!
//! Trailing mean over `period` rows with a minimum window of one: the first
//! row equals its own close, the second is the mean of the first two, and so
//! on until the window fills.

use super::rolling::rolling_mean;
use super::Indicator;
use crate::domain::{DerivedColumn, PriceBar};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    column: DerivedColumn,
}

impl Sma {
    pub fn new(period: usize, column: DerivedColumn) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self { period, column }
    }

    /// 50-row moving average.
    pub fn ma50() -> Self {
        Self::new(50, DerivedColumn::Ma50)
    }

    /// 200-row moving average.
    pub fn ma200() -> Self {
        Self::new(200, DerivedColumn::Ma200)
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn column(&self) -> DerivedColumn {
        self.column
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        let closes: Vec<Option<f64>> = bars.iter().map(|b| b.close).collect();
        rolling_mean(&closes, self.period)
    }
}
