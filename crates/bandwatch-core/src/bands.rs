//! Band estimation: mean ± sigma·stddev over window snapshots.
//!
//! Pure functions over `f64` slices; the caller decides which window
//! field feeds the mean and which feeds the dispersion. Standard
//! deviation is the population form (divide by N, not N−1), matching
//! the reference behavior of uncorrected dispersion.

use serde::{Deserialize, Serialize};

/// Band statistics computed from one recomputation pass.
///
/// `sufficient_data` is set by the caller from window size versus the
/// configured minimum sample count; below threshold the bounds exist
/// but must not be used for classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSnapshot {
    pub mean: f64,
    pub std_dev: f64,
    pub upper: f64,
    pub lower: f64,
    pub sufficient_data: bool,
}

impl Default for BandSnapshot {
    fn default() -> Self {
        Self {
            mean: 0.0,
            std_dev: 0.0,
            upper: 0.0,
            lower: 0.0,
            sufficient_data: false,
        }
    }
}

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by N). Zero for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Compute bands from a window snapshot.
///
/// Mean is taken over `center`, dispersion over `dispersion`. The two
/// series are usually the same, but the trade-tape session deliberately
/// means prices while dispersing volumes (asymmetry preserved from the
/// source design, configurable per session).
pub fn compute_bands(center: &[f64], dispersion: &[f64], sigma: f64) -> BandSnapshot {
    let mean = mean(center);
    let std_dev = population_std_dev(dispersion);
    BandSnapshot {
        mean,
        std_dev,
        upper: mean + sigma * std_dev,
        lower: mean - sigma * std_dev,
        sufficient_data: false,
    }
}
