//! Trailing-window primitives with a minimum window of one row.
//!
//! At row i the window covers rows `max(0, i + 1 - window)..=i`. Sentinel
//! values inside the window are skipped; the statistic is taken over whatever
//! usable values remain.

/// Trailing arithmetic mean. `None` when the window has no usable value or
/// the mean is not finite.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    assert!(window >= 1, "rolling window must be >= 1");
    (0..values.len())
        .map(|i| mean(&usable_window(values, i, window)))
        .collect()
}

/// Trailing sample standard deviation (n - 1 divisor).
///
/// Fewer than two usable values in the window yields `None`: a single
/// observation has no defined deviation. An overflowing variance is `None` too.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    assert!(window >= 1, "rolling window must be >= 1");
    (0..values.len())
        .map(|i| sample_std(&usable_window(values, i, window)))
        .collect()
}

/// Usable values of the window ending at row `i`.
fn usable_window(values: &[Option<f64>], i: usize, window: usize) -> Vec<f64> {
    let start = (i + 1).saturating_sub(window);
    values[start..=i].iter().flatten().copied().collect()
}

fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64).filter(|m| m.is_finite())
}

fn sample_std(xs: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 {
        return None;
    }
    let m = mean(xs)?;
    let variance = xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt()).filter(|s| s.is_finite())
}
