//! Normalized Shannon entropy.

use shared_types::stats::{finite, min_max};

/// Number of histogram buckets.
pub const ENTROPY_BINS: usize = 10;

/// Shannon entropy of `values` in `[0, 1]`.
///
/// Values are min/max normalized, bucketed into [`ENTROPY_BINS`] bins, and the
/// entropy is divided by `log2(ENTROPY_BINS)`. Empty input, a single distinct
/// value, and non-finite samples contribute nothing.
pub fn shannon_entropy(values: &[f64]) -> f64 {
    let values = finite(values.iter().copied());
    if values.is_empty() {
        return 0.0;
    }

    let (min, max) = min_max(&values);
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        return 0.0;
    }

    let mut bins = [0usize; ENTROPY_BINS];
    for v in &values {
        let normalized = (v - min) / span;
        let index = ((normalized * ENTROPY_BINS as f64) as usize).min(ENTROPY_BINS - 1);
        bins[index] += 1;
    }

    let total = values.len() as f64;
    let entropy: f64 = bins
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();

    (entropy / (ENTROPY_BINS as f64).log2()).clamp(0.0, 1.0)
}
