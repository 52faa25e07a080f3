//! Daily percentage return of close.
//!
//! R[t] = (close[t] - close[t-1]) / close[t-1] * 100
//! The first row has no predecessor and is always the sentinel, as is any
//! return that does not come out finite.

use super::Indicator;
use crate::domain::{DerivedColumn, PriceBar};

#[derive(Debug, Clone, Default)]
pub struct DailyReturn;

impl DailyReturn {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for DailyReturn {
    fn column(&self) -> DerivedColumn {
        DerivedColumn::DailyReturn
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        let mut result = vec![None; bars.len()];

        for i in 1..bars.len() {
            result[i] = match (bars[i - 1].close, bars[i].close) {
                (Some(prev), Some(curr)) if prev != 0.0 => {
                    Some((curr - prev) / prev * 100.0).filter(|r| r.is_finite())
                }
                _ => None,
            };
        }

        result
    }
}
