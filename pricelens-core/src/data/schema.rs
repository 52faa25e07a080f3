use crate::domain::{CanonicalSeries, PriceField};
use chrono::NaiveDate;
use polars::prelude::*;

/// Canonical column layout of a series exported as a DataFrame
pub struct SeriesSchema;

impl SeriesSchema {
    /// Get the canonical series schema
    pub fn schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("Date".into(), DataType::Date),
            Field::new("Open".into(), DataType::Float64),
            Field::new("High".into(), DataType::Float64),
            Field::new("Low".into(), DataType::Float64),
            Field::new("Close".into(), DataType::Float64),
            Field::new("Volume".into(), DataType::Int64),
        ])
    }

    /// Validate DataFrame against schema
    pub fn validate(df: &DataFrame) -> Result<(), SchemaError> {
        let expected = Self::schema();
        let actual = df.schema();

        // Check all required columns exist
        for field in expected.iter_fields() {
            if !actual.contains(field.name()) {
                return Err(SchemaError::MissingColumn(field.name().to_string()));
            }
        }

        // Check data types match
        for field in expected.iter_fields() {
            let actual_dtype = actual
                .get(field.name())
                .ok_or_else(|| SchemaError::MissingColumn(field.name().to_string()))?;
            if actual_dtype != field.dtype() {
                return Err(SchemaError::TypeMismatch {
                    column: field.name().to_string(),
                    expected: field.dtype().clone(),
                    actual: actual_dtype.clone(),
                });
            }
        }

        Ok(())
    }
}

impl CanonicalSeries {
    /// Export as a DataFrame: canonical columns first, then every attached
    /// derived column as Float64. Sentinels become nulls.
    pub fn to_frame(&self) -> Result<DataFrame, SchemaError> {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).ok_or(SchemaError::Polars(
            "epoch date out of range".into(),
        ))?;
        let days: Vec<i32> = self
            .bars()
            .iter()
            .map(|b| (b.date - epoch).num_days() as i32)
            .collect();
        let dates = Series::new("Date".into(), days)
            .cast(&DataType::Date)
            .map_err(|e| SchemaError::Polars(e.to_string()))?;

        let mut columns: Vec<Column> = vec![dates.into()];
        for field in [PriceField::Open, PriceField::High, PriceField::Low, PriceField::Close] {
            columns.push(Series::new(field.column_name().into(), self.column(field)).into());
        }
        let volume: Vec<Option<i64>> = self.bars().iter().map(|b| b.volume).collect();
        columns.push(Series::new("Volume".into(), volume).into());

        for column in self.derived_columns() {
            let values: Vec<Option<f64>> = self.derived(column).map(<[_]>::to_vec).unwrap_or_default();
            columns.push(Series::new(column.name().into(), values).into());
        }

        DataFrame::new(columns).map_err(|e| SchemaError::Polars(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Type mismatch in column {column}: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        actual: DataType,
    },

    #[error("DataFrame construction failed: {0}")]
    Polars(String),
}
