//! CanonicalSeries: the validated, date-ordered OHLCV table plus any derived
//! columns attached for a single request.

use super::bar::{PriceBar, PriceField};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Derived overlay columns the metric engine can attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DerivedColumn {
    #[serde(rename = "MA50")]
    Ma50,
    #[serde(rename = "MA200")]
    Ma200,
    DailyReturn,
    Volatility,
}

impl DerivedColumn {
    pub const ALL: [DerivedColumn; 4] = [
        DerivedColumn::Ma50,
        DerivedColumn::Ma200,
        DerivedColumn::DailyReturn,
        DerivedColumn::Volatility,
    ];

    /// Column name as exposed to the rendering layer.
    pub fn name(self) -> &'static str {
        match self {
            DerivedColumn::Ma50 => "MA50",
            DerivedColumn::Ma200 => "MA200",
            DerivedColumn::DailyReturn => "DailyReturn",
            DerivedColumn::Volatility => "Volatility",
        }
    }
}

impl std::fmt::Display for DerivedColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("duplicate date {0} in series")]
    DuplicateDate(NaiveDate),

    #[error("date {next} follows {prev}: series must be strictly increasing")]
    OutOfOrder { prev: NaiveDate, next: NaiveDate },
}

/// Ordered-by-date OHLCV series for one symbol.
///
/// Invariants:
/// - dates are unique and strictly increasing
/// - every derived column has exactly one value per bar
/// - an empty series never carries derived columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalSeries {
    symbol: String,
    bars: Vec<PriceBar>,
    derived: BTreeMap<DerivedColumn, Vec<Option<f64>>>,
}

impl CanonicalSeries {
    /// The empty result: no usable data for `symbol`.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
            derived: BTreeMap::new(),
        }
    }

    /// Build a series from bars that are already sorted by date.
    pub fn from_bars(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for pair in bars.windows(2) {
            let (prev, next) = (pair[0].date, pair[1].date);
            if prev == next {
                return Err(SeriesError::DuplicateDate(next));
            }
            if prev > next {
                return Err(SeriesError::OutOfOrder { prev, next });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
            derived: BTreeMap::new(),
        })
    }

    /// Wrap bars the fetcher has already sorted and de-duplicated.
    pub(crate) fn from_sorted(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        debug_assert!(
            bars.windows(2).all(|w| w[0].date < w[1].date),
            "bars must have strictly increasing dates"
        );
        Self {
            symbol: symbol.into(),
            bars,
            derived: BTreeMap::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<Option<f64>> {
        self.column(PriceField::Close)
    }

    /// Values of one canonical column, in date order.
    pub fn column(&self, field: PriceField) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.value(field)).collect()
    }

    /// Bar for a given trading day.
    pub fn get(&self, date: NaiveDate) -> Option<&PriceBar> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|i| &self.bars[i])
    }

    /// True if any bar carries the missing-numeric sentinel.
    pub fn has_sentinels(&self) -> bool {
        self.bars.iter().any(PriceBar::has_sentinel)
    }

    /// Values of an attached derived column.
    pub fn derived(&self, column: DerivedColumn) -> Option<&[Option<f64>]> {
        self.derived.get(&column).map(|v| v.as_slice())
    }

    pub fn has_derived(&self, column: DerivedColumn) -> bool {
        self.derived.contains_key(&column)
    }

    /// Derived columns currently attached, in a stable order.
    pub fn derived_columns(&self) -> impl Iterator<Item = DerivedColumn> + '_ {
        self.derived.keys().copied()
    }

    /// Attach (or replace) a derived column. Ignored on an empty series.
    pub(crate) fn attach(&mut self, column: DerivedColumn, values: Vec<Option<f64>>) {
        if self.bars.is_empty() {
            return;
        }
        debug_assert_eq!(
            values.len(),
            self.bars.len(),
            "derived column {column} must align with bars"
        );
        self.derived.insert(column, values);
    }

    pub(crate) fn clear_derived(&mut self) {
        self.derived.clear();
    }
}
