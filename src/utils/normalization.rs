//! Normalization Utilities
//!
//! Converts caller-supplied slider targets and weights into dense metric
//! vectors, and holds the fixed-point rounding helpers used at the pipeline's
//! intermediate steps. Later thresholds compare against these rounded values,
//! so the rounding points are part of the scoring contract.

use crate::metrics::{MetricVector, PartialMetrics, NEUTRAL_VALUE};

/// Lower bound applied to each raw weight before normalization
pub const MIN_WEIGHT: f64 = 0.01;
/// Upper bound applied to each raw weight before normalization
pub const MAX_WEIGHT: f64 = 1000.0;
/// Raw weight for metrics the caller did not mention
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Cost range (EUR/kg) mapped onto the inverted 0-100 cost score
pub const COST_FLOOR_EUR_KG: f64 = 1.0;
pub const COST_CEILING_EUR_KG: f64 = 25.0;

#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Round to a fixed number of decimals (half away from zero)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Dense target vector: absent sliders default to 50, all clamped to [0, 100]
pub fn normalize_sliders(sliders: &PartialMetrics) -> MetricVector {
    MetricVector::from_partial(sliders, NEUTRAL_VALUE).map(|_, v| clamp(v, 0.0, 100.0))
}

/// Dense weight vector summing to 1
///
/// Absent weights default to 1; every weight is clamped to [0.01, 1000]
/// first, so the sum is always positive.
pub fn normalize_weights(weights: Option<&PartialMetrics>) -> MetricVector {
    let raw = match weights {
        Some(partial) => MetricVector::from_partial(partial, DEFAULT_WEIGHT),
        None => MetricVector::splat(DEFAULT_WEIGHT),
    }
    .map(|_, w| clamp(w, MIN_WEIGHT, MAX_WEIGHT));

    let sum = raw.sum();
    raw.map(|_, w| w / sum)
}

/// Map an average EUR/kg price onto the inverted 0-100 cost score (1 decimal)
///
/// 1 EUR/kg or less scores 100, 25 EUR/kg or more scores 0.
pub fn cost_to_score(eur_per_kg: f64) -> f64 {
    let span = COST_CEILING_EUR_KG - COST_FLOOR_EUR_KG;
    let normalized = (clamp(eur_per_kg, COST_FLOOR_EUR_KG, COST_CEILING_EUR_KG) - COST_FLOOR_EUR_KG) / span;
    round_to(100.0 - normalized * 100.0, 1)
}

/// 0-100 score onto a 0-10 display scale (1 decimal)
pub fn to_ten_scale(score_0_100: f64) -> f64 {
    round_to(clamp(score_0_100, 0.0, 100.0) / 10.0, 1)
}
