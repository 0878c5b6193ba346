//! Vector comparison primitives used throughout scoring

use crate::metrics::{Metric, MetricVector};

/// Cosine similarity over the full metric vocabulary
///
/// Returns 0.0 (not NaN) when either vector has zero norm.
pub fn cosine_similarity(a: &MetricVector, b: &MetricVector) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for metric in Metric::ALL {
        let av = a[metric];
        let bv = b[metric];
        dot += av * bv;
        norm_a += av * av;
        norm_b += bv * bv;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Weighted closeness of `actual` to `target`
///
/// Per metric: closeness = 1 - min(|actual - target|, 100) / 100, summed with
/// the given weights. Weights are used as-is (callers normalize upstream).
pub fn weighted_closeness(actual: &MetricVector, target: &MetricVector, weights: &MetricVector) -> f64 {
    Metric::ALL
        .into_iter()
        .map(|metric| {
            let diff = (actual[metric] - target[metric]).abs();
            let closeness = 1.0 - diff.min(100.0) / 100.0;
            weights[metric] * closeness
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PartialMetrics;
    use crate::utils::normalization::normalize_sliders;
    use approx::assert_relative_eq;

    #[test]
    fn test_cosine_of_identical_vectors_is_one() {
        let sliders: PartialMetrics = [
            (Metric::Breathability, 20.0),
            (Metric::Durability, 40.0),
            (Metric::Softness, 60.0),
        ]
        .into_iter()
        .collect();
        let a = normalize_sliders(&sliders);
        assert_relative_eq!(cosine_similarity(&a, &a), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cosine_with_zero_vector_is_zero() {
        let zero = MetricVector::zeros();
        let v = MetricVector::neutral();
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_weighted_closeness_perfect_match_equals_weight_sum() {
        let target = MetricVector::splat(70.0);
        let weights = MetricVector::splat(1.0 / Metric::COUNT as f64);
        assert_relative_eq!(weighted_closeness(&target, &target, &weights), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_weighted_closeness_caps_distance() {
        let mut actual = MetricVector::zeros();
        let mut target = MetricVector::zeros();
        let mut weights = MetricVector::zeros();
        actual[Metric::Durability] = -150.0;
        target[Metric::Durability] = 100.0;
        weights[Metric::Durability] = 2.0;
        // Distance is capped at 100, so closeness bottoms out at zero
        assert_eq!(weighted_closeness(&actual, &target, &weights), 0.0);

        actual[Metric::Durability] = 75.0;
        assert_relative_eq!(weighted_closeness(&actual, &target, &weights), 1.5, epsilon = 1e-12);
    }
}
