//! Per-call generation input

use crate::data::{BiodegradabilityClass, Material, RiskClass};
use crate::metrics::{Metric, PartialMetrics};
use serde::{Deserialize, Serialize};

/// Hard constraints a caller can place on eligible materials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateConstraints {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub must_biodegradable: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_animal_fibers: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_microplastic_risk: Option<RiskClass>,
    /// EUR/kg ceiling compared against each material's minimum cost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<f64>,
}

impl GenerateConstraints {
    /// Whether a material survives these constraints
    pub fn admits(&self, material: &Material) -> bool {
        if self.must_biodegradable
            && material.constraints.biodegradability_class == BiodegradabilityClass::Low
        {
            return false;
        }
        if self.no_animal_fibers && material.constraints.animal_fiber {
            return false;
        }
        if let Some(ceiling) = self.max_microplastic_risk {
            if material.constraints.microplastic_risk > ceiling {
                return false;
            }
        }
        if let Some(max_cost) = self.max_cost {
            if material.cost_min > max_cost {
                return false;
            }
        }
        true
    }
}

/// Target profile and context for one generation call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionInput {
    /// Use-case label (legacy free text such as "Denim" or "luxury")
    #[serde(default)]
    pub use_case: String,
    /// Registry id; takes precedence over `use_case` when it resolves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case_id: Option<String>,
    /// Target value per metric (absent = 50)
    #[serde(default)]
    pub sliders: PartialMetrics,
    /// Relative importance per metric (absent = 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<PartialMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<GenerateConstraints>,
}

impl SessionInput {
    pub fn new(use_case: impl Into<String>) -> Self {
        Self {
            use_case: use_case.into(),
            ..Default::default()
        }
    }

    pub fn with_use_case_id(mut self, id: impl Into<String>) -> Self {
        self.use_case_id = Some(id.into());
        self
    }

    pub fn with_slider(mut self, metric: Metric, value: f64) -> Self {
        self.sliders.insert(metric, value);
        self
    }

    pub fn with_weight(mut self, metric: Metric, weight: f64) -> Self {
        self.weights.get_or_insert_with(PartialMetrics::new).insert(metric, weight);
        self
    }

    pub fn with_constraints(mut self, constraints: GenerateConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Catalog;

    #[test]
    fn test_constraints_filter_reference_catalog() {
        let catalog = Catalog::reference().unwrap();
        let strict = GenerateConstraints {
            must_biodegradable: true,
            no_animal_fibers: true,
            max_microplastic_risk: Some(RiskClass::Low),
            max_cost: Some(10.0),
        };

        let admitted: Vec<&Material> = catalog.materials().iter().filter(|m| strict.admits(m)).collect();
        assert!(!admitted.is_empty());
        for m in admitted {
            assert_ne!(m.constraints.biodegradability_class, BiodegradabilityClass::Low);
            assert!(!m.constraints.animal_fiber);
            assert_eq!(m.constraints.microplastic_risk, RiskClass::Low);
            assert!(m.cost_min <= 10.0);
        }

        let open = GenerateConstraints::default();
        assert!(catalog.materials().iter().all(|m| open.admits(m)));
    }

    #[test]
    fn test_session_json_shape() {
        let input: SessionInput = serde_json::from_str(
            r#"{"use_case": "Denim", "sliders": {"durability": 80},
                "constraints": {"no_animal_fibers": true, "max_microplastic_risk": "medium"}}"#,
        )
        .unwrap();
        assert_eq!(input.use_case, "Denim");
        assert_eq!(input.sliders.get(&Metric::Durability), Some(&80.0));
        assert!(input.weights.is_none());
        let constraints = input.constraints.unwrap();
        assert!(constraints.no_animal_fibers);
        assert_eq!(constraints.max_microplastic_risk, Some(RiskClass::Medium));
    }

    #[test]
    fn test_builder_serializes_canonically() {
        let a = SessionInput::new("Denim")
            .with_slider(Metric::Softness, 40.0)
            .with_slider(Metric::Durability, 80.0);
        let b = SessionInput::new("Denim")
            .with_slider(Metric::Durability, 80.0)
            .with_slider(Metric::Softness, 40.0);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            r#"{"use_case":"Denim","sliders":{"durability":80.0,"softness":40.0}}"#
        );
    }
}
