//! Descriptive statistics over outcome samples.

use oracle_core::constants::PERCENTILES;
use oracle_core::models::outcome::FieldSummary;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Sort ascending, NaN-tolerant.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Compute the k-th percentile of a sorted slice.
pub fn percentile(sorted: &[f64], k: u32) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (k as f64 / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Coefficient of variation, `None` when the mean is zero.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let m = mean(values);
    if m.abs() < f64::EPSILON {
        return None;
    }
    Some(std_dev(values) / m.abs())
}

/// Mean, dispersion and the declared [`PERCENTILES`] of `values`.
pub fn summarize(values: &[f64]) -> FieldSummary {
    let s = sorted(values);
    let [p10, p50, p90] = PERCENTILES.map(|k| percentile(&s, k));
    FieldSummary {
        mean: mean(values),
        std_dev: std_dev(values),
        p10,
        p50,
        p90,
    }
}
