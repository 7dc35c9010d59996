//! Peak normalization to single precision.

/// Added to the peak before dividing, so silence normalizes to silence.
pub const NORMALIZE_EPSILON: f64 = 1e-9;

/// Largest absolute value in `samples`.
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
}

/// Scales `samples` by `1 / (peak + epsilon)` and converts to `f32`.
///
/// The result never exceeds 1.0 in absolute value. An all-zero or empty
/// input stays all-zero or empty.
pub fn normalize_peak(samples: &[f64]) -> Vec<f32> {
    let scale = peak(samples) + NORMALIZE_EPSILON;
    samples.iter().map(|&s| (s / scale) as f32).collect()
}
