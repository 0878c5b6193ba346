use crate::explanation::types::{ConflictWarning, Severity};
use crate::metrics::{Metric, PartialMetrics, NEUTRAL_VALUE};

/// Two slider targets that conflict when both reach their thresholds
struct ConflictRule {
    id: &'static str,
    title: &'static str,
    detail: &'static str,
    severity: Severity,
    first: (Metric, f64),
    second: (Metric, f64),
}

const CONFLICT_RULES: &[ConflictRule] = &[
    ConflictRule {
        id: "elasticity-bio",
        title: "Elasticity vs biodegradability",
        detail: "High stretch often requires elastomer content that can reduce biodegradability.",
        severity: Severity::High,
        first: (Metric::Elasticity, 75.0),
        second: (Metric::Biodegradability, 75.0),
    },
    ConflictRule {
        id: "durability-lightness",
        title: "Durability vs lightness",
        detail: "Very light constructions can make it harder to maximize long-term durability.",
        severity: Severity::Medium,
        first: (Metric::Durability, 80.0),
        second: (Metric::WeightLightness, 80.0),
    },
    ConflictRule {
        id: "cost-co2",
        title: "Low cost vs very low CO2",
        detail: "Aggressive cost targets can conflict with the lowest-impact material pathways.",
        severity: Severity::Medium,
        first: (Metric::Cost, 80.0),
        second: (Metric::Co2, 80.0),
    },
];

/// Check slider targets for known trade-offs
///
/// Absent sliders count as 50. Warnings come back in rule order.
pub fn detect_conflicts(sliders: &PartialMetrics) -> Vec<ConflictWarning> {
    let value = |metric: Metric| sliders.get(&metric).copied().unwrap_or(NEUTRAL_VALUE);

    CONFLICT_RULES
        .iter()
        .filter(|rule| value(rule.first.0) >= rule.first.1 && value(rule.second.0) >= rule.second.1)
        .map(|rule| ConflictWarning {
            id: rule.id.to_string(),
            title: rule.title.to_string(),
            detail: rule.detail.to_string(),
            severity: rule.severity,
        })
        .collect()
}
