//! Rolling volatility: trailing sample standard deviation of close.
//!
//! Default window is 30 rows, minimum window one. A window with fewer than two
//! usable closes (always the case on the first row) yields the sentinel.

use super::rolling::rolling_std;
use super::Indicator;
use crate::domain::{DerivedColumn, PriceBar};

pub const DEFAULT_VOLATILITY_WINDOW: usize = 30;

#[derive(Debug, Clone)]
pub struct Volatility {
    period: usize,
}

impl Volatility {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Volatility period must be >= 1");
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Default for Volatility {
    fn default() -> Self {
        Self::new(DEFAULT_VOLATILITY_WINDOW)
    }
}

impl Indicator for Volatility {
    fn column(&self) -> DerivedColumn {
        DerivedColumn::Volatility
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        let closes: Vec<Option<f64>> = bars.iter().map(|b| b.close).collect();
        rolling_std(&closes, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, make_close_bars, DEFAULT_EPSILON};

    #[test]
    fn first_row_is_sentinel() {
        let bars = make_close_bars(&[10.0, 12.0]);
        let result = Volatility::default().compute(&bars);
        assert_eq!(result[0], None);
        // sample std of [10, 12] = sqrt(2)
        assert_approx(result[1], 2.0_f64.sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn constant_price_zero_volatility() {
        let bars = make_close_bars(&[100.0, 100.0, 100.0, 100.0]);
        let result = Volatility::default().compute(&bars);
        for v in &result[1..] {
            assert_approx(*v, 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn window_rolls_after_period() {
        // Window 3 at the last row covers [2, 4, 6]: sample std = 2
        let bars = make_close_bars(&[1000.0, 2.0, 4.0, 6.0]);
        let result = Volatility::new(3).compute(&bars);
        assert_approx(result[3], 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sentinel_closes_are_skipped() {
        let bars = make_bars(&[Some(10.0), None, Some(12.0)]);
        let result = Volatility::default().compute(&bars);
        assert_eq!(result[1], None);
        assert_approx(result[2], 2.0_f64.sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn default_window() {
        assert_eq!(Volatility::default().period(), 30);
    }
}
