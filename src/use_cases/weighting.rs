//! Use-case weighting and constraint layer
//!
//! Applies a resolved [`UseCaseConfig`] at three points of the pipeline:
//! - before filtering: merge its microplastic ceiling into caller constraints
//! - before scoring: bias slider weights toward its favored metrics
//! - after scoring: a secondary 0-1 objective plus flat penalties and bonuses

use super::{UseCaseConfig, MAX_PROPERTY_BIAS};
use crate::circularity::CircularityAssessment;
use crate::data::{is_elastomer_name, CompositionPart, MaterialLookup, RiskClass};
use crate::metrics::{Metric, MetricGroup, MetricVector};
use crate::predictor::Feasibility;
use crate::session::GenerateConstraints;
use crate::utils::{clamp, mean};

const ELASTANE_EXCLUSION_PENALTY: f64 = 0.12;
const MULTI_MATERIAL_PENALTY: f64 = 0.05;
/// Per point of shortfall below the recyclability minimum
const RECYCLABILITY_GAP_PENALTY: f64 = 0.03;
/// Per point above the microplastic ceiling
const MICROPLASTIC_GAP_PENALTY: f64 = 0.03;
const PREFERRED_FAMILY_BONUS: f64 = 0.09;
const DISCOURAGED_FAMILY_PENALTY: f64 = 0.10;
/// Microplastic scale at or below which the low-microplastic bonus applies
const LOW_MICROPLASTIC_THRESHOLD: f64 = 4.0;

/// Caller constraints tightened by the use case's microplastic ceiling
///
/// The numeric 0-10 ceiling maps to a risk class; the stricter of that and
/// any caller-supplied class wins.
pub fn merge_constraints(input: Option<&GenerateConstraints>, use_case: &UseCaseConfig) -> GenerateConstraints {
    let mut merged = input.cloned().unwrap_or_default();

    if let Some(ceiling) = use_case.constraints.max_microplastic_risk {
        let mapped = RiskClass::from_ceiling(ceiling);
        merged.max_microplastic_risk = Some(match merged.max_microplastic_risk {
            Some(existing) => existing.min(mapped),
            None => mapped,
        });
    }

    merged
}

/// Multiply each weight by (1 + bias), bias clamped to [0, 1.5], then renormalize
///
/// Returns `weights` unchanged if the biased sum is not positive.
pub fn adjust_weights_for_use_case(weights: &MetricVector, use_case: &UseCaseConfig) -> MetricVector {
    let mut biased = *weights;
    for (&metric, &bias) in &use_case.property_bias {
        biased[metric] *= 1.0 + clamp(bias, 0.0, MAX_PROPERTY_BIAS);
    }

    let sum = biased.sum();
    if sum <= 0.0 {
        return *weights;
    }
    biased.map(|_, w| w / sum)
}

/// Secondary 0-1 objective over the use case's five score dimensions
pub fn candidate_use_case_objective(
    properties: &MetricVector,
    circularity: &CircularityAssessment,
    feasibility: &Feasibility,
    use_case: &UseCaseConfig,
) -> f64 {
    let weights = &use_case.score_weights;

    let performance = properties.group_mean(MetricGroup::Performance) / 100.0;
    let sustainability = properties.group_mean(MetricGroup::Sustainability) / 100.0;
    let circular = circularity.circularity_score / 10.0;
    let cost = properties[Metric::Cost] / 100.0;
    let feasible = (mean(&[properties[Metric::Scalability], properties[Metric::Cost]]) * 0.6
        + feasibility.trl_est / 9.0 * 100.0 * 0.4)
        / 100.0;

    weights.performance * performance
        + weights.sustainability * sustainability
        + weights.circularity * circular
        + weights.cost * cost
        + weights.feasibility * feasible
}

/// Additive score delta from the use case's constraints, preferences and bonuses
pub fn apply_use_case_penalties_and_bonuses(
    composition: &[CompositionPart],
    circularity: &CircularityAssessment,
    use_case: &UseCaseConfig,
    lookup: &MaterialLookup,
) -> f64 {
    let constraints = &use_case.constraints;
    let components = composition.iter().filter(|p| p.pct > 0).count();
    let has_elastomer = composition.iter().any(|p| is_elastomer_name(&p.name));
    let mut delta = 0.0;

    if constraints.no_elastane && has_elastomer {
        delta -= ELASTANE_EXCLUSION_PENALTY;
    }
    if constraints.prefer_monomaterial && components > 2 {
        delta -= MULTI_MATERIAL_PENALTY;
    }
    if let Some(min) = constraints.must_be_recyclable_min {
        let gap = min - circularity.recyclability_score;
        if gap > 0.0 {
            delta -= gap * RECYCLABILITY_GAP_PENALTY;
        }
    }
    if let Some(ceiling) = constraints.max_microplastic_risk {
        let gap = circularity.microplastic_risk - ceiling;
        if gap > 0.0 {
            delta -= gap * MICROPLASTIC_GAP_PENALTY;
        }
    }

    let mut preferred_pct = 0.0;
    let mut discouraged_pct = 0.0;
    for part in composition {
        let Some(material) = lookup.get(&part.material_id) else {
            continue;
        };
        let family = material.family();
        if use_case.prefers(family) {
            preferred_pct += part.pct as f64;
        }
        if use_case.discourages(family) {
            discouraged_pct += part.pct as f64;
        }
    }
    delta += preferred_pct / 100.0 * PREFERRED_FAMILY_BONUS;
    delta -= discouraged_pct / 100.0 * DISCOURAGED_FAMILY_PENALTY;

    if components <= 2 {
        delta += use_case.bonuses.monomaterial_bonus / 100.0;
    }
    if circularity.microplastic_risk <= LOW_MICROPLASTIC_THRESHOLD {
        delta += use_case.bonuses.low_microplastic_bonus / 100.0;
    }

    delta
}
