//! Use-case profiles
//!
//! A use case biases generation toward an application context (denim,
//! upholstery, circular design, ...). It carries:
//! - five score weights (performance, sustainability, circularity, cost,
//!   feasibility) summing to 1
//! - multipliers on slider weights for selected performance metrics
//! - optional end-of-life constraints and flat bonuses
//! - preferred and discouraged material families
//!
//! `registry` holds the built-in profiles and id/label resolution;
//! `weighting` applies a resolved profile during scoring.

pub mod registry;
pub mod weighting;

pub use registry::{UseCaseGroup, UseCaseRegistry, DEFAULT_USE_CASE_ID};
pub use weighting::{
    adjust_weights_for_use_case, apply_use_case_penalties_and_bonuses, candidate_use_case_objective,
    merge_constraints,
};

use crate::data::MaterialFamily;
use crate::metrics::{Metric, PartialMetrics};
use crate::utils::round_to;
use serde::{Deserialize, Serialize};

/// Upper bound on a property bias multiplier
pub const MAX_PROPERTY_BIAS: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UseCaseCategory {
    ApparelPerformance,
    ApparelFashion,
    Interior,
    Technical,
    Sustainability,
}

impl UseCaseCategory {
    pub const ALL: [UseCaseCategory; 5] = [
        UseCaseCategory::ApparelPerformance,
        UseCaseCategory::ApparelFashion,
        UseCaseCategory::Interior,
        UseCaseCategory::Technical,
        UseCaseCategory::Sustainability,
    ];

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            UseCaseCategory::ApparelPerformance => "Apparel Performance",
            UseCaseCategory::ApparelFashion => "Apparel Fashion",
            UseCaseCategory::Interior => "Interior",
            UseCaseCategory::Technical => "Technical",
            UseCaseCategory::Sustainability => "Sustainability",
        }
    }

    /// Wire name ("APPAREL_PERFORMANCE", ...)
    pub fn as_str(self) -> &'static str {
        match self {
            UseCaseCategory::ApparelPerformance => "APPAREL_PERFORMANCE",
            UseCaseCategory::ApparelFashion => "APPAREL_FASHION",
            UseCaseCategory::Interior => "INTERIOR",
            UseCaseCategory::Technical => "TECHNICAL",
            UseCaseCategory::Sustainability => "SUSTAINABILITY",
        }
    }
}

/// Weights of the five use-case objective dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub performance: f64,
    pub sustainability: f64,
    pub circularity: f64,
    pub cost: f64,
    pub feasibility: f64,
}

impl ScoreWeights {
    pub const fn new(performance: f64, sustainability: f64, circularity: f64, cost: f64, feasibility: f64) -> Self {
        Self {
            performance,
            sustainability,
            circularity,
            cost,
            feasibility,
        }
    }

    pub fn sum(&self) -> f64 {
        self.performance + self.sustainability + self.circularity + self.cost + self.feasibility
    }

    /// Rescale to sum 1, each weight rounded to 4 decimals
    ///
    /// Non-positive totals are returned unchanged.
    pub fn normalized(&self) -> Self {
        let total = self.sum();
        if total <= 0.0 {
            return *self;
        }
        Self {
            performance: round_to(self.performance / total, 4),
            sustainability: round_to(self.sustainability / total, 4),
            circularity: round_to(self.circularity / total, 4),
            cost: round_to(self.cost / total, 4),
            feasibility: round_to(self.feasibility / total, 4),
        }
    }
}

/// End-of-life requirements of a use case
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EolConstraint {
    pub prefer_monomaterial: bool,
    pub no_elastane: bool,
    /// Minimum recyclability score (0-10)
    pub must_be_recyclable_min: Option<f64>,
    /// Microplastic ceiling on the 0-10 circularity scale
    pub max_microplastic_risk: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialPreference {
    pub preferred_families: Vec<MaterialFamily>,
    pub discouraged_families: Vec<MaterialFamily>,
}

/// Flat score bonuses, in hundredths of a score point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UseCaseBonuses {
    pub monomaterial_bonus: f64,
    pub low_microplastic_bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseCaseConfig {
    pub id: String,
    pub label: String,
    pub category: UseCaseCategory,
    pub description: String,
    pub score_weights: ScoreWeights,
    /// Slider-weight multipliers (0-1.5) on performance metrics
    #[serde(default)]
    pub property_bias: PartialMetrics,
    /// Suggested slider starting points for front ends
    #[serde(default, skip_serializing_if = "PartialMetrics::is_empty")]
    pub target_hint: PartialMetrics,
    #[serde(default)]
    pub constraints: EolConstraint,
    #[serde(default)]
    pub material_preferences: MaterialPreference,
    #[serde(default)]
    pub bonuses: UseCaseBonuses,
}

impl UseCaseConfig {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        category: UseCaseCategory,
        description: impl Into<String>,
        score_weights: ScoreWeights,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
            description: description.into(),
            score_weights,
            property_bias: PartialMetrics::new(),
            target_hint: PartialMetrics::new(),
            constraints: EolConstraint::default(),
            material_preferences: MaterialPreference::default(),
            bonuses: UseCaseBonuses::default(),
        }
    }

    pub fn with_bias(mut self, bias: &[(Metric, f64)]) -> Self {
        self.property_bias.extend(bias.iter().copied());
        self
    }

    pub fn with_microplastic_ceiling(mut self, ceiling: f64) -> Self {
        self.constraints.max_microplastic_risk = Some(ceiling);
        self
    }

    pub fn with_recyclable_min(mut self, min: f64) -> Self {
        self.constraints.must_be_recyclable_min = Some(min);
        self
    }

    pub fn excluding_elastane(mut self) -> Self {
        self.constraints.no_elastane = true;
        self
    }

    pub fn preferring_monomaterial(mut self) -> Self {
        self.constraints.prefer_monomaterial = true;
        self
    }

    pub fn with_preferred(mut self, families: &[MaterialFamily]) -> Self {
        self.material_preferences.preferred_families = families.to_vec();
        self
    }

    pub fn with_discouraged(mut self, families: &[MaterialFamily]) -> Self {
        self.material_preferences.discouraged_families = families.to_vec();
        self
    }

    pub fn with_monomaterial_bonus(mut self, bonus: f64) -> Self {
        self.bonuses.monomaterial_bonus = bonus;
        self
    }

    pub fn with_low_microplastic_bonus(mut self, bonus: f64) -> Self {
        self.bonuses.low_microplastic_bonus = bonus;
        self
    }

    pub fn prefers(&self, family: MaterialFamily) -> bool {
        self.material_preferences.preferred_families.contains(&family)
    }

    pub fn discourages(&self, family: MaterialFamily) -> bool {
        self.material_preferences.discouraged_families.contains(&family)
    }
}
