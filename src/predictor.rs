//! Property Predictor
//!
//! Turns a composition into predicted metrics, LCA figures and feasibility.
//!
//! Algorithm:
//! 1. Linearly blend every metric, LCA figure and TRL by percentage share
//! 2. Apply synergy rules to the blended metric vector
//! 3. Round every metric to one decimal, clamp to [0, 100]
//! 4. Round CO2 to 2 decimals, water to 0, energy and TRL to 1
//!
//! Parts referencing a material absent from the lookup contribute nothing.
//! Their ids are recorded on the prediction and logged at warn level.

use crate::data::{CompositionPart, Lca, MaterialLookup, RiskClass};
use crate::metrics::MetricVector;
use crate::rules::{apply_synergy_rules, estimate_supply_risk};
use crate::utils::{clamp, round_to};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feasibility {
    pub trl_est: f64,
    pub supply_risk: RiskClass,
}

/// Predicted outcome of one composition
#[derive(Debug, Clone, PartialEq)]
pub struct BlendPrediction {
    pub properties: MetricVector,
    pub lca: Lca,
    pub feasibility: Feasibility,
    /// Composition parts that were skipped because the lookup lacked them
    pub skipped_material_ids: Vec<String>,
}

impl BlendPrediction {
    pub fn is_complete(&self) -> bool {
        self.skipped_material_ids.is_empty()
    }
}

pub fn predict_blend(composition: &[CompositionPart], lookup: &MaterialLookup) -> BlendPrediction {
    let mut linear = MetricVector::zeros();
    let mut lca = Lca::default();
    let mut trl = 0.0;
    let mut skipped_material_ids = Vec::new();

    for part in composition {
        let Some(material) = lookup.get(&part.material_id) else {
            tracing::warn!(
                material_id = %part.material_id,
                pct = part.pct,
                "Composition references unknown material; part skipped"
            );
            skipped_material_ids.push(part.material_id.clone());
            continue;
        };

        let share = part.share();
        for (metric, value) in material.properties.iter() {
            linear[metric] += value * share;
        }
        lca.co2_kg_per_kg += material.lca.co2_kg_per_kg * share;
        lca.water_l_per_kg += material.lca.water_l_per_kg * share;
        lca.energy_mj_per_kg += material.lca.energy_mj_per_kg * share;
        trl += material.trl * share;
    }

    let properties = apply_synergy_rules(&linear, composition, lookup)
        .map(|_, v| clamp(round_to(v, 1), 0.0, 100.0));

    BlendPrediction {
        properties,
        lca: Lca {
            co2_kg_per_kg: round_to(lca.co2_kg_per_kg, 2),
            water_l_per_kg: round_to(lca.water_l_per_kg, 0),
            energy_mj_per_kg: round_to(lca.energy_mj_per_kg, 1),
        },
        feasibility: Feasibility {
            trl_est: round_to(trl, 1),
            supply_risk: estimate_supply_risk(composition, lookup),
        },
        skipped_material_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Catalog;
    use crate::metrics::Metric;
    use approx::assert_relative_eq;

    fn part(catalog: &Catalog, id: &str, pct: i32) -> CompositionPart {
        CompositionPart::new(catalog.find(id).unwrap(), pct)
    }

    #[test]
    fn test_single_material_reproduces_catalog_values() {
        let catalog = Catalog::reference().unwrap();
        let lookup = catalog.lookup();
        let lyocell = catalog.find("lyocell").unwrap();

        let prediction = predict_blend(&[part(&catalog, "lyocell", 100)], &lookup);
        assert_eq!(prediction.properties, lyocell.properties);
        assert_eq!(prediction.lca, lyocell.lca);
        assert_eq!(prediction.feasibility.trl_est, 9.0);
        assert_eq!(prediction.feasibility.supply_risk, RiskClass::Low);
        assert!(prediction.is_complete());
    }

    #[test]
    fn test_linear_blend_with_hemp_synergy() {
        let catalog = Catalog::reference().unwrap();
        let lookup = catalog.lookup();

        // hemp durability 88, lyocell 68; 0.5*88 + 0.5*68 = 78, +5 from hemp rule
        let composition = vec![part(&catalog, "hemp", 50), part(&catalog, "lyocell", 50)];
        let prediction = predict_blend(&composition, &lookup);
        assert_relative_eq!(prediction.properties[Metric::Durability], 83.0, epsilon = 1e-9);
        // softness 0.5*48 + 0.5*85 = 66.5, -4
        assert_relative_eq!(prediction.properties[Metric::Softness], 62.5, epsilon = 1e-9);
        // co2 0.5*1.9 + 0.5*2.8
        assert_relative_eq!(prediction.lca.co2_kg_per_kg, 2.35, epsilon = 1e-9);
        assert_eq!(prediction.lca.water_l_per_kg, 775.0);
        assert_relative_eq!(prediction.feasibility.trl_est, 8.5, epsilon = 1e-9);
    }

    #[test]
    fn test_clamping_after_synergy() {
        let catalog = Catalog::reference().unwrap();
        let lookup = catalog.lookup();

        // elastane-heavy blend: elasticity 98 + 8 would exceed 100
        let composition = vec![part(&catalog, "elastane", 100)];
        let prediction = predict_blend(&composition, &lookup);
        assert_eq!(prediction.properties[Metric::Elasticity], 100.0);
        // biodegradability 2 - 8 clamps at 0
        assert_eq!(prediction.properties[Metric::Biodegradability], 0.0);
        for (_, value) in prediction.properties.iter() {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_unknown_material_is_skipped_and_recorded() {
        let catalog = Catalog::reference().unwrap();
        let lookup = catalog.lookup();

        let composition = vec![
            part(&catalog, "hemp", 60),
            CompositionPart {
                material_id: "unobtainium".to_string(),
                name: "Unobtainium".to_string(),
                pct: 40,
            },
        ];
        let prediction = predict_blend(&composition, &lookup);

        assert_eq!(prediction.skipped_material_ids, vec!["unobtainium".to_string()]);
        assert!(!prediction.is_complete());
        // only 60% of hemp's breathability (82) contributes
        assert_relative_eq!(prediction.properties[Metric::Breathability], 49.2, epsilon = 1e-9);
        assert_relative_eq!(prediction.feasibility.trl_est, 4.8, epsilon = 1e-9);
    }
}
