//! Criterion benchmarks for the pipeline hot paths.
//!
//! Benchmarks:
//! 1. Payload validation (decode through coercion)
//! 2. Metric derivation (single column and full feature set)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pricelens_core::data::payload::parse_series;
use pricelens_core::derive::{derive, FeatureSet};
use pricelens_core::domain::{CanonicalSeries, PriceBar};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open: Some(close - 0.3),
                high: Some(close + 1.5),
                low: Some(close - 1.5),
                close: Some(close),
                volume: Some(1_000_000),
            }
        })
        .collect()
}

fn make_body(n: usize) -> String {
    let points: Vec<serde_json::Value> = make_bars(n)
        .iter()
        .map(|b| {
            serde_json::json!({
                "date": b.date.format("%Y-%m-%d").to_string(),
                "open": b.open, "high": b.high, "low": b.low,
                "close": b.close, "volume": b.volume,
            })
        })
        .collect();
    serde_json::json!({"symbol": "BENCH", "data": points}).to_string()
}

// ── 1. Payload validation ────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_validation");

    for &bar_count in &[252, 1260, 2520] {
        let body = make_body(bar_count);
        group.bench_with_input(BenchmarkId::new("parse_series", bar_count), &body, |b, body| {
            b.iter(|| {
                let mut warnings = Vec::new();
                parse_series("BENCH", black_box(body), &mut warnings)
            });
        });
    }

    group.finish();
}

// ── 2. Metric derivation ─────────────────────────────────────────────

fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive");

    for &bar_count in &[252, 1260, 2520] {
        let series = CanonicalSeries::from_bars("BENCH", make_bars(bar_count)).unwrap();

        group.bench_with_input(BenchmarkId::new("ma200", bar_count), &series, |b, s| {
            b.iter(|| derive(black_box(s), FeatureSet::MA200));
        });

        group.bench_with_input(BenchmarkId::new("all_features", bar_count), &series, |b, s| {
            b.iter(|| derive(black_box(s), FeatureSet::all()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_derive);
criterion_main!(benches);
