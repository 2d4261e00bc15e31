//! Activation functions for raw model logits.
//!
//! These are pure numeric helpers; they never allocate except for the output
//! of [`softmax`].

/// Logistic sigmoid, `e^x / (1 + e^x)`.
///
/// Evaluated in the form that keeps the exponent non-positive so large
/// magnitudes saturate to `0` or `1` instead of producing `inf / inf`.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let k = x.exp();
        k / (1.0 + k)
    }
}

/// Softmax over a slice of logits.
///
/// The maximum is subtracted before exponentiating and the sums are taken in
/// `f64`. An empty input yields an empty output.
pub fn softmax(values: &[f32]) -> Vec<f32> {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f64> = values
        .iter()
        .map(|&v| f64::from(v - max).exp())
        .collect();
    let sum: f64 = exp.iter().sum();
    exp.into_iter().map(|v| (v / sum) as f32).collect()
}

/// Returns the index and value of the largest element.
///
/// Ties resolve to the lowest index. Returns `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, best_value)| value > best_value) {
            best = Some((idx, value));
        }
    }
    best
}
