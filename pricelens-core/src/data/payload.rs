//! Payload validation: raw response body → CanonicalSeries.
//!
//! Each stage is a gate returning either the next intermediate value or a
//! terminal [`FetchError`]. [`parse_series`] threads them together with `?`:
//!
//! 1. decode: body must be JSON
//! 2. structure: object with `symbol` (string) and `data` (array)
//! 3. emptiness: `data` must have at least one point
//! 4. columns: map payload keys to canonical columns; a column absent from
//!    every point voids the whole result
//! 5. dates: parse, sort ascending, reject duplicates
//! 6. coercion: per-value numeric parse, sentinel on failure
//!
//! Stages 1–5 are all-or-nothing. Stage 6 never fails: an unusable value only
//! affects its own field and is reported as a [`FetchWarning`].

use super::provider::{FetchError, FetchWarning};
use crate::domain::{CanonicalSeries, PriceBar, PriceField};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::warn;

/// Canonical name of the date column.
pub const DATE_COLUMN: &str = "Date";
const DATE_KEY: &str = "date";

/// Top-level document after structural validation.
#[derive(Debug, Clone)]
pub struct RawPayload {
    pub symbol: String,
    pub points: Vec<Value>,
}

/// One point-record with its payload keys resolved to canonical columns.
///
/// A key missing from this particular record maps to `Value::Null`, which
/// later coerces to the sentinel.
#[derive(Debug, Clone)]
pub struct MappedPoint {
    pub date: Value,
    pub fields: [Value; 5],
}

/// A point whose date has been parsed; values are still uncoerced.
#[derive(Debug, Clone)]
pub struct DatedPoint {
    pub date: NaiveDate,
    pub fields: [Value; 5],
}

/// Run every validation stage over a response body.
///
/// Warnings (symbol mismatch, sentinel coercions) are appended to `warnings`
/// even when the series is ultimately returned.
pub fn parse_series(
    requested_symbol: &str,
    body: &str,
    warnings: &mut Vec<FetchWarning>,
) -> Result<CanonicalSeries, FetchError> {
    let document = decode(body)?;
    let payload = validate_structure(document)?;
    if let Some(w) = check_symbol(requested_symbol, &payload.symbol) {
        warnings.push(w);
    }
    let points = require_points(payload)?;
    let mapped = map_columns(points)?;
    let dated = normalize_dates(mapped)?;
    let (bars, report) = coerce(dated);
    if let Some(w) = report {
        warnings.push(w);
    }

    Ok(CanonicalSeries::from_sorted(requested_symbol, bars))
}

/// Stage 1: decode the body as JSON.
pub fn decode(body: &str) -> Result<Value, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Stage 2: require an object with a string `symbol` and an array `data`.
pub fn validate_structure(document: Value) -> Result<RawPayload, FetchError> {
    let mut map = match document {
        Value::Object(map) => map,
        other => {
            return Err(FetchError::SchemaMismatch(format!(
                "expected an object at the top level, got {}",
                json_type(&other)
            )))
        }
    };

    let symbol = match map.remove("symbol") {
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(FetchError::SchemaMismatch(format!(
                "'symbol' must be a string, got {}",
                json_type(&other)
            )))
        }
        None => return Err(FetchError::SchemaMismatch("missing key 'symbol'".into())),
    };

    let points = match map.remove("data") {
        Some(Value::Array(points)) => points,
        Some(other) => {
            return Err(FetchError::SchemaMismatch(format!(
                "'data' must be an array, got {}",
                json_type(&other)
            )))
        }
        None => return Err(FetchError::SchemaMismatch("missing key 'data'".into())),
    };

    Ok(RawPayload { symbol, points })
}

/// Lenient symbol check: a case-insensitive mismatch is a warning, never a
/// rejection. The requested symbol stays authoritative.
pub fn check_symbol(requested: &str, returned: &str) -> Option<FetchWarning> {
    if requested.to_uppercase() == returned.to_uppercase() {
        return None;
    }
    warn!(
        requested,
        returned, "remote returned data for a different symbol"
    );
    Some(FetchWarning::SymbolMismatch {
        requested: requested.to_string(),
        returned: returned.to_string(),
    })
}

/// Stage 3: an empty `data` array is "no data points".
pub fn require_points(payload: RawPayload) -> Result<Vec<Value>, FetchError> {
    if payload.points.is_empty() {
        return Err(FetchError::NoDataPoints);
    }
    Ok(payload.points)
}

/// Stage 4: map payload keys onto canonical columns.
///
/// Keys match exactly (`open`, not `Open`). Column presence is judged over the
/// whole point set: if no point carries a key, the column is missing and the
/// whole result is void. There is no backfilling of absent columns.
pub fn map_columns(points: Vec<Value>) -> Result<Vec<MappedPoint>, FetchError> {
    let mut records: Vec<Map<String, Value>> = Vec::with_capacity(points.len());
    for (index, point) in points.into_iter().enumerate() {
        match point {
            Value::Object(map) => records.push(map),
            other => {
                return Err(FetchError::SchemaMismatch(format!(
                    "data point {index} must be an object, got {}",
                    json_type(&other)
                )))
            }
        }
    }

    if !records.iter().any(|r| r.contains_key(DATE_KEY)) {
        return Err(FetchError::MissingColumn(DATE_COLUMN));
    }
    for field in PriceField::ALL {
        if !records.iter().any(|r| r.contains_key(field.payload_key())) {
            return Err(FetchError::MissingColumn(field.column_name()));
        }
    }

    Ok(records
        .into_iter()
        .map(|mut r| MappedPoint {
            date: r.remove(DATE_KEY).unwrap_or(Value::Null),
            fields: PriceField::ALL.map(|f| r.remove(f.payload_key()).unwrap_or(Value::Null)),
        })
        .collect())
}

/// Stage 5: parse dates into the ordering key, sort, and reject duplicates.
pub fn normalize_dates(points: Vec<MappedPoint>) -> Result<Vec<DatedPoint>, FetchError> {
    let mut dated = Vec::with_capacity(points.len());
    for (index, point) in points.into_iter().enumerate() {
        let date = parse_date(&point.date).ok_or_else(|| FetchError::InvalidDate {
            index,
            value: point.date.to_string(),
        })?;
        dated.push(DatedPoint {
            date,
            fields: point.fields,
        });
    }

    // Stable sort: payload order is preserved among equal dates, which are
    // rejected right after.
    dated.sort_by_key(|p| p.date);
    if let Some(pair) = dated.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(FetchError::DuplicateDate(pair[1].date));
    }

    Ok(dated)
}

/// Stage 6: numeric coercion with sentinel-on-failure.
///
/// Returns the bars plus a warning if any value was replaced by the sentinel.
pub fn coerce(points: Vec<DatedPoint>) -> (Vec<PriceBar>, Option<FetchWarning>) {
    let mut affected: BTreeSet<PriceField> = BTreeSet::new();
    let mut count = 0usize;

    let bars: Vec<PriceBar> = points
        .into_iter()
        .map(|p| {
            let [open, high, low, close, volume] = &p.fields;
            let bar = PriceBar {
                date: p.date,
                open: coerce_f64(open),
                high: coerce_f64(high),
                low: coerce_f64(low),
                close: coerce_f64(close),
                volume: coerce_i64(volume),
            };
            for field in PriceField::ALL {
                if bar.value(field).is_none() {
                    affected.insert(field);
                    count += 1;
                }
            }
            bar
        })
        .collect();

    if count == 0 {
        return (bars, None);
    }

    let columns: Vec<PriceField> = affected.into_iter().collect();
    warn!(
        count,
        columns = ?columns,
        "unusable values replaced with the missing sentinel"
    );
    (bars, Some(FetchWarning::UnusableValues { columns, count }))
}

/// Parse a price value. JSON numbers and numeric strings are accepted;
/// everything else, including non-finite results, is the sentinel.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Parse a volume value. Integral floats (`1000000.0`) are accepted; fractional
/// or out-of-range values are the sentinel.
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_to_i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_to_i64))
        }
        _ => None,
    }
}

fn integral_to_i64(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// Accepts `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS`,
/// and RFC 3339 timestamps (date part taken as written).
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
