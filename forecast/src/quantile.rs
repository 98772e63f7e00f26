//! Empirical quantiles over sampled trajectories.
//!
//! Linear interpolation at fractional rank `p * (n - 1)` over the sorted samples, the
//! default definition used by numpy. No distributional assumption is made.

use ndarray::{ArrayView1, Axis};

use crate::error::InferenceError;
use crate::model::SampleBatch;

pub const LOW_QUANTILE: f64 = 0.1;
pub const MEDIAN_QUANTILE: f64 = 0.5;
pub const HIGH_QUANTILE: f64 = 0.9;

/// Quantile `p` (in `[0, 1]`) of an ascending slice. Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Per-step bands reduced from a sample batch.
#[derive(Clone, Debug, PartialEq)]
pub struct Bands {
    pub low: Vec<f64>,
    pub median: Vec<f64>,
    pub high: Vec<f64>,
}

fn column_quantiles(column: ArrayView1<'_, f32>) -> Result<(f64, f64, f64), InferenceError> {
    let mut values: Vec<f64> = column.iter().map(|v| *v as f64).collect();
    if values.iter().any(|v| !v.is_finite()) {
        return Err(InferenceError::NonFinite);
    }
    values.sort_by(f64::total_cmp);
    let q = |p| quantile_sorted(&values, p).ok_or(InferenceError::NoSamples);
    Ok((q(LOW_QUANTILE)?, q(MEDIAN_QUANTILE)?, q(HIGH_QUANTILE)?))
}

/// Reduces a `(num_samples, horizon)` batch to 10th / 50th / 90th percentile per step.
///
/// Quantiles of one sorted column are monotone in `p`, so `low <= median <= high` holds
/// for every step.
pub fn reduce(batch: &SampleBatch) -> Result<Bands, InferenceError> {
    if batch.nrows() == 0 {
        return Err(InferenceError::NoSamples);
    }
    let horizon = batch.ncols();
    let mut bands = Bands {
        low: Vec::with_capacity(horizon),
        median: Vec::with_capacity(horizon),
        high: Vec::with_capacity(horizon),
    };
    for column in batch.axis_iter(Axis(1)) {
        let (low, median, high) = column_quantiles(column)?;
        bands.low.push(low);
        bands.median.push(median);
        bands.high.push(high);
    }
    Ok(bands)
}
