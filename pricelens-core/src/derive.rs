//! Metric derivation engine.
//!
//! `derive` is a pure function of (series, flags): it never touches its input
//! and attaches exactly the requested columns to a fresh copy. Computing on an
//! empty series is a no-op.

use crate::domain::{CanonicalSeries, DerivedColumn};
use crate::indicators::{DailyReturn, Indicator, Sma, Volatility};
use bitflags::bitflags;
use tracing::{debug, warn};

bitflags! {
    /// Derived columns a caller can request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FeatureSet: u8 {
        const MA50 = 1 << 0;
        const MA200 = 1 << 1;
        const DAILY_RETURN = 1 << 2;
        const VOLATILITY = 1 << 3;
    }
}

impl FeatureSet {
    /// Parse one toggle value emitted by the control surface.
    ///
    /// Accepts the flag names (`MA50`, `DAILY_RETURN`, ...), the derived column
    /// names (`DailyReturn`, `Volatility`), and the chart toggles
    /// `SHOW_RETURNS` / `SHOW_VOLATILITY`.
    pub fn from_toggle(toggle: &str) -> Option<FeatureSet> {
        match toggle.trim() {
            "SHOW_RETURNS" | "DailyReturn" => Some(FeatureSet::DAILY_RETURN),
            "SHOW_VOLATILITY" | "Volatility" => Some(FeatureSet::VOLATILITY),
            other => FeatureSet::from_name(other),
        }
    }

    /// Union of every recognised toggle. Unknown toggles are logged and skipped.
    pub fn from_toggles<I, S>(toggles: I) -> FeatureSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        toggles
            .into_iter()
            .fold(FeatureSet::empty(), |acc, toggle| {
                match FeatureSet::from_toggle(toggle.as_ref()) {
                    Some(flag) => acc | flag,
                    None => {
                        warn!(toggle = toggle.as_ref(), "ignoring unknown feature toggle");
                        acc
                    }
                }
            })
    }

    /// Derived columns this set selects.
    pub fn columns(self) -> Vec<DerivedColumn> {
        let mut columns = Vec::new();
        if self.contains(FeatureSet::MA50) {
            columns.push(DerivedColumn::Ma50);
        }
        if self.contains(FeatureSet::MA200) {
            columns.push(DerivedColumn::Ma200);
        }
        if self.contains(FeatureSet::DAILY_RETURN) {
            columns.push(DerivedColumn::DailyReturn);
        }
        if self.contains(FeatureSet::VOLATILITY) {
            columns.push(DerivedColumn::Volatility);
        }
        columns
    }
}

/// Build the indicator for a derived column.
pub fn indicator_for(column: DerivedColumn) -> Box<dyn Indicator> {
    match column {
        DerivedColumn::Ma50 => Box::new(Sma::ma50()),
        DerivedColumn::Ma200 => Box::new(Sma::ma200()),
        DerivedColumn::DailyReturn => Box::new(DailyReturn::new()),
        DerivedColumn::Volatility => Box::new(Volatility::default()),
    }
}

/// Return `series` augmented with only the requested derived columns.
///
/// Moving averages whose every value is the sentinel (close entirely unusable)
/// are omitted rather than attached as noise.
pub fn derive(series: &CanonicalSeries, flags: FeatureSet) -> CanonicalSeries {
    let mut out = series.clone();
    out.clear_derived();

    if out.is_empty() {
        return out;
    }

    for column in flags.columns() {
        let values = indicator_for(column).compute(out.bars());
        let is_moving_average = matches!(column, DerivedColumn::Ma50 | DerivedColumn::Ma200);
        if is_moving_average && values.iter().all(Option::is_none) {
            debug!(%column, "omitting moving average: close has no usable values");
            continue;
        }
        out.attach(column, values);
    }

    out
}
