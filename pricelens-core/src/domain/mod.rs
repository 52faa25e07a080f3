//! Domain types for PriceLens

pub mod bar;
pub mod series;

pub use bar::{PriceBar, PriceField};
pub use series::{CanonicalSeries, DerivedColumn, SeriesError};
