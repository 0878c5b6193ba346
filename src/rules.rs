//! Synergy and feasibility rules
//!
//! Synergy rules adjust the linear metric blend when a trigger material is
//! present above a share threshold. Each rule is an independent check against
//! the composition; rules never read each other's output, so application order
//! does not matter. Values are left unclamped here: the predictor clamps once
//! after every rule has applied.

use crate::data::{CompositionPart, Material, MaterialLookup, RiskClass};
use crate::metrics::{Metric, MetricVector};

/// Material-triggered, threshold-gated metric adjustment
#[derive(Debug, Clone, Copy)]
pub struct SynergyRule {
    pub name: &'static str,
    /// Lowercase name fragments; any match triggers the rule
    pub trigger: &'static [&'static str],
    /// Minimum percentage of the triggering part
    pub min_pct: i32,
    pub adjustments: &'static [(Metric, f64)],
}

impl SynergyRule {
    pub fn triggered_by(&self, material: &Material, pct: i32) -> bool {
        if pct < self.min_pct {
            return false;
        }
        let name = material.name.to_lowercase();
        self.trigger.iter().any(|fragment| name.contains(fragment))
    }
}

pub const SYNERGY_RULES: &[SynergyRule] = &[
    // Bast fiber backbone: stronger yarn, harsher hand
    SynergyRule {
        name: "hemp_structure",
        trigger: &["hemp"],
        min_pct: 20,
        adjustments: &[(Metric::Durability, 5.0), (Metric::Softness, -4.0)],
    },
    // Elastomer content: stretch at the cost of end-of-life
    SynergyRule {
        name: "elastane_stretch",
        trigger: &["elastane"],
        min_pct: 8,
        adjustments: &[
            (Metric::Elasticity, 8.0),
            (Metric::Biodegradability, -8.0),
            (Metric::MicroplasticRisk, -6.0),
        ],
    },
];

/// Apply every synergy rule to a linear blend
///
/// Parts whose material is missing from `lookup` are skipped.
pub fn apply_synergy_rules(
    base: &MetricVector,
    composition: &[CompositionPart],
    lookup: &MaterialLookup,
) -> MetricVector {
    let mut result = *base;

    for part in composition {
        let Some(material) = lookup.get(&part.material_id) else {
            continue;
        };
        for rule in SYNERGY_RULES {
            if rule.triggered_by(material, part.pct) {
                for &(metric, delta) in rule.adjustments {
                    result[metric] += delta;
                }
            }
        }
    }

    result
}

/// Share-weighted average TRL and microplastic ordinal of a composition
pub fn weighted_trl_and_risk(composition: &[CompositionPart], lookup: &MaterialLookup) -> (f64, f64) {
    let mut trl = 0.0;
    let mut risk = 0.0;

    for part in composition {
        let Some(material) = lookup.get(&part.material_id) else {
            continue;
        };
        trl += material.trl * part.share();
        risk += material.constraints.microplastic_risk.ordinal() * part.share();
    }

    (trl, risk)
}

/// Supply-risk class from a two-threshold decision tree
///
/// - low: average TRL >= 8 and average risk ordinal <= 1.4
/// - medium: average TRL >= 6
/// - high: otherwise
pub fn estimate_supply_risk(composition: &[CompositionPart], lookup: &MaterialLookup) -> RiskClass {
    let (trl, risk) = weighted_trl_and_risk(composition, lookup);

    if trl >= 8.0 && risk <= 1.4 {
        RiskClass::Low
    } else if trl >= 6.0 {
        RiskClass::Medium
    } else {
        RiskClass::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Catalog;
    use approx::assert_relative_eq;

    fn part(catalog: &Catalog, id: &str, pct: i32) -> CompositionPart {
        CompositionPart::new(catalog.find(id).unwrap(), pct)
    }

    #[test]
    fn test_hemp_rule_threshold() {
        let catalog = Catalog::reference().unwrap();
        let lookup = catalog.lookup();
        let base = MetricVector::neutral();

        let below = vec![part(&catalog, "hemp", 19), part(&catalog, "lyocell", 81)];
        assert_eq!(apply_synergy_rules(&base, &below, &lookup), base);

        let at = vec![part(&catalog, "hemp", 20), part(&catalog, "lyocell", 80)];
        let out = apply_synergy_rules(&base, &at, &lookup);
        assert_eq!(out[Metric::Durability], 55.0);
        assert_eq!(out[Metric::Softness], 46.0);
        assert_eq!(out[Metric::Elasticity], 50.0);
    }

    #[test]
    fn test_elastane_rule_and_no_clamping() {
        let catalog = Catalog::reference().unwrap();
        let lookup = catalog.lookup();
        let mut base = MetricVector::neutral();
        base[Metric::Elasticity] = 97.0;
        base[Metric::MicroplasticRisk] = 3.0;

        let blend = vec![part(&catalog, "organic-cotton", 90), part(&catalog, "elastane", 10)];
        let out = apply_synergy_rules(&base, &blend, &lookup);
        // Out-of-range values survive until the predictor clamps
        assert_eq!(out[Metric::Elasticity], 105.0);
        assert_eq!(out[Metric::Biodegradability], 42.0);
        assert_eq!(out[Metric::MicroplasticRisk], -3.0);
    }

    #[test]
    fn test_rules_are_order_independent() {
        let catalog = Catalog::reference().unwrap();
        let lookup = catalog.lookup();
        let base = MetricVector::neutral();

        let a = vec![part(&catalog, "hemp", 60), part(&catalog, "elastane", 40)];
        let b = vec![part(&catalog, "elastane", 40), part(&catalog, "hemp", 60)];
        assert_eq!(apply_synergy_rules(&base, &a, &lookup), apply_synergy_rules(&base, &b, &lookup));
    }

    #[test]
    fn test_unknown_material_is_skipped() {
        let catalog = Catalog::reference().unwrap();
        let lookup = catalog.lookup();
        let base = MetricVector::neutral();
        let ghost = vec![CompositionPart {
            material_id: "ghost-hemp".to_string(),
            name: "Ghost Hemp".to_string(),
            pct: 100,
        }];
        assert_eq!(apply_synergy_rules(&base, &ghost, &lookup), base);
        assert_eq!(estimate_supply_risk(&ghost, &lookup), RiskClass::High);
    }

    #[test]
    fn test_supply_risk_thresholds() {
        let catalog = Catalog::reference().unwrap();
        let lookup = catalog.lookup();

        // TRL 9 and 9, both low microplastic risk
        let mature = vec![part(&catalog, "organic-cotton", 50), part(&catalog, "lyocell", 50)];
        assert_eq!(estimate_supply_risk(&mature, &lookup), RiskClass::Low);

        // TRL 9, but 30% high-risk synthetic lifts the ordinal to 1.6
        let synthetic = vec![part(&catalog, "organic-cotton", 70), part(&catalog, "recycled-polyester", 30)];
        let (trl, risk) = weighted_trl_and_risk(&synthetic, &lookup);
        assert_relative_eq!(trl, 9.0, epsilon = 1e-9);
        assert_relative_eq!(risk, 1.6, epsilon = 1e-9);
        assert_eq!(estimate_supply_risk(&synthetic, &lookup), RiskClass::Medium);

        // TRL 5 nettle dominates
        let emerging = vec![part(&catalog, "nettle", 80), part(&catalog, "pla-fiber", 20)];
        assert_eq!(estimate_supply_risk(&emerging, &lookup), RiskClass::High);
    }
}
