//! Use-case registry
//!
//! Built-in profiles plus resolution of caller references. Resolution never
//! fails: anything unrecognized maps to the default profile.
//!
//! Resolution order:
//! 1. `use_case_id` matching a registry id
//! 2. `use_case_id` via the alias table
//! 3. `use_case` label via the legacy label table
//! 4. `use_case` label that normalizes to a registry id
//! 5. default profile

use super::{ScoreWeights, UseCaseCategory, UseCaseConfig};
use crate::data::MaterialFamily::{Bast, Biopolymer, Cellulosic, Natural, Protein, Synthetic};
use crate::error::EngineError;
use crate::metrics::Metric::{
    Breathability, Durability, Elasticity, Softness, ThermalRegulation, WeightLightness,
};
use crate::metrics::MetricGroup;
use crate::session::SessionInput;
use rustc_hash::FxHashMap;

pub const DEFAULT_USE_CASE_ID: &str = "sportswear";

/// Retired profile ids still accepted in `use_case_id`
const ID_ALIASES: &[(&str, &str)] = &[
    ("denim-dailywear", "denim"),
    ("luxury-soft-touch", "luxury-fashion"),
    ("upholstery-interior", "upholstery"),
    ("workwear-durability", "workwear"),
    ("outdoor-technical-shell", "outdoor-technical"),
    ("circular-min-microplastic", "circular-design"),
    ("cost-optimized-basics", "fast-fashion"),
];

/// Free-text labels from the original five-profile interface
const LEGACY_LABELS: &[(&str, &str)] = &[
    ("sportswear", "sportswear"),
    ("denim", "denim"),
    ("luxury", "luxury-fashion"),
    ("interior", "upholstery"),
    ("cycling", "cycling-apparel"),
    ("outdoor", "outdoor-technical"),
    ("running", "running-apparel"),
    ("knitwear", "knitwear"),
    ("workwear", "workwear"),
    ("circular", "circular-design"),
];

/// Profiles of one category, in registry order
#[derive(Debug, Clone, PartialEq)]
pub struct UseCaseGroup<'a> {
    pub category: UseCaseCategory,
    pub label: &'static str,
    pub items: Vec<&'a UseCaseConfig>,
}

#[derive(Debug, Clone)]
pub struct UseCaseRegistry {
    configs: Vec<UseCaseConfig>,
    by_id: FxHashMap<String, usize>,
    default_index: usize,
    aliases: FxHashMap<String, String>,
    legacy_labels: FxHashMap<String, String>,
}

impl Default for UseCaseRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl UseCaseRegistry {
    /// The 18 built-in profiles with alias and legacy tables
    pub fn builtin() -> Self {
        let configs: Vec<UseCaseConfig> = builtin_profiles()
            .into_iter()
            .map(|mut c| {
                c.score_weights = c.score_weights.normalized();
                c
            })
            .collect();
        let by_id = index_by_id(&configs);
        let default_index = by_id.get(DEFAULT_USE_CASE_ID).copied().unwrap_or(0);

        Self {
            configs,
            by_id,
            default_index,
            aliases: to_map(ID_ALIASES),
            legacy_labels: to_map(LEGACY_LABELS),
        }
    }

    /// Custom registry; score weights are renormalized
    ///
    /// Fails if `default_id` is missing, ids repeat, a weight total is not
    /// positive, or a property bias targets a non-performance metric.
    pub fn new(configs: Vec<UseCaseConfig>, default_id: &str) -> Result<Self, EngineError> {
        for config in &configs {
            if config.score_weights.sum() <= 0.0 {
                return Err(EngineError::InvalidRegistry(format!(
                    "use case '{}' has non-positive score weights",
                    config.id
                )));
            }
            if let Some(metric) = config
                .property_bias
                .keys()
                .find(|m| m.group() != MetricGroup::Performance)
            {
                return Err(EngineError::InvalidRegistry(format!(
                    "use case '{}' biases non-performance metric '{}'",
                    config.id, metric
                )));
            }
        }

        let configs: Vec<UseCaseConfig> = configs
            .into_iter()
            .map(|mut c| {
                c.score_weights = c.score_weights.normalized();
                c
            })
            .collect();
        let by_id = index_by_id(&configs);
        if by_id.len() != configs.len() {
            return Err(EngineError::InvalidRegistry("duplicate use-case id".to_string()));
        }
        let default_index = by_id.get(default_id).copied().ok_or_else(|| {
            EngineError::InvalidRegistry(format!("default use case '{}' is not registered", default_id))
        })?;

        Ok(Self {
            configs,
            by_id,
            default_index,
            aliases: FxHashMap::default(),
            legacy_labels: FxHashMap::default(),
        })
    }

    /// Register an id alias; ignored if the target is unknown
    pub fn with_alias(mut self, alias: &str, target: &str) -> Self {
        if self.by_id.contains_key(target) {
            self.aliases.insert(alias.to_string(), target.to_string());
        }
        self
    }

    /// Register a legacy free-text label; ignored if the target is unknown
    pub fn with_legacy_label(mut self, label: &str, target: &str) -> Self {
        if self.by_id.contains_key(target) {
            self.legacy_labels.insert(normalize_label(label), target.to_string());
        }
        self
    }

    pub fn all(&self) -> &[UseCaseConfig] {
        &self.configs
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&UseCaseConfig> {
        self.by_id.get(id).map(|&i| &self.configs[i])
    }

    pub fn default_config(&self) -> &UseCaseConfig {
        &self.configs[self.default_index]
    }

    pub fn get_or_default(&self, id: Option<&str>) -> &UseCaseConfig {
        id.and_then(|id| self.get(id)).unwrap_or_else(|| self.default_config())
    }

    /// Resolve an id / label pair to a registered profile id
    pub fn resolve_id(&self, use_case_id: Option<&str>, use_case: &str) -> &str {
        if let Some(id) = use_case_id {
            if let Some(config) = self.get(id) {
                return &config.id;
            }
            if let Some(config) = self.aliases.get(id).and_then(|target| self.get(target)) {
                return &config.id;
            }
        }

        let label = normalize_label(use_case);
        if let Some(config) = self.legacy_labels.get(&label).and_then(|target| self.get(target)) {
            return &config.id;
        }
        if let Some(config) = self.get(&label) {
            return &config.id;
        }

        &self.default_config().id
    }

    pub fn resolve(&self, input: &SessionInput) -> &UseCaseConfig {
        let id = self.resolve_id(input.use_case_id.as_deref(), &input.use_case);
        self.get_or_default(Some(id))
    }

    /// Filter by category and text query, grouped by category in first-seen order
    ///
    /// The query matches case-insensitively against label, id, category and
    /// description, treating '-' and '_' as spaces. An empty query matches all.
    pub fn groups(&self, query: &str, category: Option<UseCaseCategory>) -> Vec<UseCaseGroup<'_>> {
        let needle = normalize_search_text(query);
        let mut groups: Vec<UseCaseGroup<'_>> = Vec::new();

        for config in &self.configs {
            if category.is_some_and(|c| c != config.category) {
                continue;
            }
            if !needle.is_empty() {
                let haystack = normalize_search_text(&format!(
                    "{} {} {} {}",
                    config.label,
                    config.id,
                    config.category.as_str(),
                    config.description
                ));
                if !haystack.contains(&needle) {
                    continue;
                }
            }

            match groups.iter_mut().find(|g| g.category == config.category) {
                Some(group) => group.items.push(config),
                None => groups.push(UseCaseGroup {
                    category: config.category,
                    label: config.category.label(),
                    items: vec![config],
                }),
            }
        }

        groups
    }
}

fn index_by_id(configs: &[UseCaseConfig]) -> FxHashMap<String, usize> {
    configs
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id.clone(), i))
        .collect()
}

fn to_map(pairs: &[(&str, &str)]) -> FxHashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// "Luxury Fashion" / "luxury_fashion" → "luxury-fashion"
fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase().replace(['_', ' '], "-")
}

fn normalize_search_text(text: &str) -> String {
    text.to_lowercase().replace(['-', '_'], " ").trim().to_string()
}

fn builtin_profiles() -> Vec<UseCaseConfig> {
    use UseCaseCategory::*;

    vec![
        // Apparel performance
        UseCaseConfig::new(
            "sportswear",
            "Sportswear",
            ApparelPerformance,
            "High breathability and elasticity with balanced circularity.",
            ScoreWeights::new(0.4, 0.2, 0.2, 0.08, 0.12),
        )
        .with_bias(&[(Breathability, 1.0), (Elasticity, 1.0), (WeightLightness, 0.35), (Durability, 0.3)])
        .with_microplastic_ceiling(6.5)
        .with_preferred(&[Cellulosic, Biopolymer])
        .with_discouraged(&[Protein]),
        UseCaseConfig::new(
            "cycling-apparel",
            "Cycling Apparel",
            ApparelPerformance,
            "Breathability, lightness, and elasticity for high-motion cycling gear.",
            ScoreWeights::new(0.44, 0.16, 0.14, 0.08, 0.18),
        )
        .with_bias(&[(Breathability, 0.8), (WeightLightness, 1.0), (Elasticity, 0.95), (Durability, 0.4)])
        .with_microplastic_ceiling(7.0)
        .with_preferred(&[Cellulosic, Biopolymer])
        .with_discouraged(&[Protein]),
        UseCaseConfig::new(
            "outdoor-technical",
            "Outdoor Technical",
            ApparelPerformance,
            "Max durability and thermal regulation with stronger feasibility pressure.",
            ScoreWeights::new(0.42, 0.14, 0.12, 0.08, 0.24),
        )
        .with_bias(&[(Durability, 1.0), (ThermalRegulation, 0.9), (WeightLightness, 0.35)])
        .with_microplastic_ceiling(7.5)
        .with_preferred(&[Cellulosic, Bast, Biopolymer]),
        UseCaseConfig::new(
            "running-apparel",
            "Running Apparel",
            ApparelPerformance,
            "Max weight lightness and breathability with moderate cost sensitivity.",
            ScoreWeights::new(0.41, 0.16, 0.14, 0.12, 0.17),
        )
        .with_bias(&[(WeightLightness, 1.0), (Breathability, 0.95), (Elasticity, 0.5)])
        .with_microplastic_ceiling(6.5)
        .with_preferred(&[Cellulosic, Natural])
        .with_discouraged(&[Protein]),
        UseCaseConfig::new(
            "base-layers",
            "Base Layers",
            ApparelPerformance,
            "Softness and thermal regulation with capped microplastic risk.",
            ScoreWeights::new(0.37, 0.2, 0.17, 0.09, 0.17),
        )
        .with_bias(&[(Softness, 1.0), (ThermalRegulation, 0.95), (Breathability, 0.35)])
        .with_microplastic_ceiling(5.5)
        .with_preferred(&[Cellulosic, Natural])
        .with_discouraged(&[Synthetic]),
        // Apparel fashion
        UseCaseConfig::new(
            "luxury-fashion",
            "Luxury Fashion",
            ApparelFashion,
            "Softness and handfeel oriented profile with low cost weight.",
            ScoreWeights::new(0.38, 0.24, 0.16, 0.04, 0.18),
        )
        .with_bias(&[(Softness, 1.0), (ThermalRegulation, 0.55), (Breathability, 0.35)])
        .with_microplastic_ceiling(5.0)
        .with_low_microplastic_bonus(5.0)
        .with_preferred(&[Cellulosic, Natural]),
        UseCaseConfig::new(
            "fast-fashion",
            "Fast Fashion",
            ApparelFashion,
            "High cost and feasibility priority with acceptable mid durability.",
            ScoreWeights::new(0.24, 0.14, 0.08, 0.31, 0.23),
        )
        .with_bias(&[(Durability, 0.35), (Softness, 0.2)])
        .with_microplastic_ceiling(7.5)
        .with_preferred(&[Natural, Cellulosic]),
        UseCaseConfig::new(
            "tailoring-formal",
            "Tailoring Formal",
            ApparelFashion,
            "Durability and structure with low elasticity preference.",
            ScoreWeights::new(0.36, 0.18, 0.14, 0.11, 0.21),
        )
        .with_bias(&[(Durability, 0.85), (Elasticity, 0.05), (ThermalRegulation, 0.2)])
        .with_microplastic_ceiling(6.5)
        .with_preferred(&[Natural, Cellulosic])
        .with_discouraged(&[Biopolymer]),
        UseCaseConfig::new(
            "knitwear",
            "Knitwear",
            ApparelFashion,
            "Softness and elasticity with medium durability.",
            ScoreWeights::new(0.36, 0.2, 0.16, 0.09, 0.19),
        )
        .with_bias(&[(Softness, 1.0), (Elasticity, 0.75), (Durability, 0.35)])
        .with_microplastic_ceiling(6.0)
        .with_preferred(&[Cellulosic, Natural]),
        UseCaseConfig::new(
            "denim",
            "Denim",
            ApparelFashion,
            "Very high durability with low to medium elasticity.",
            ScoreWeights::new(0.4, 0.17, 0.13, 0.1, 0.2),
        )
        .with_bias(&[(Durability, 1.0), (Elasticity, 0.25), (Softness, 0.15)])
        .with_microplastic_ceiling(6.5)
        .with_preferred(&[Bast, Natural, Cellulosic]),
        // Interior
        UseCaseConfig::new(
            "upholstery",
            "Upholstery",
            Interior,
            "Very high durability, recyclable threshold, and capped microplastic risk.",
            ScoreWeights::new(0.33, 0.17, 0.2, 0.14, 0.16),
        )
        .with_bias(&[(Durability, 1.0), (Softness, 0.25)])
        .with_recyclable_min(5.5)
        .with_microplastic_ceiling(6.0)
        .excluding_elastane()
        .with_monomaterial_bonus(6.0)
        .with_preferred(&[Natural, Cellulosic])
        .with_discouraged(&[Biopolymer]),
        UseCaseConfig::new(
            "bedding-linens",
            "Bedding Linens",
            Interior,
            "Softness and breathability focus with moderate circularity pressure.",
            ScoreWeights::new(0.34, 0.2, 0.18, 0.1, 0.18),
        )
        .with_bias(&[(Softness, 1.0), (Breathability, 0.85), (ThermalRegulation, 0.25)])
        .with_microplastic_ceiling(5.5)
        .with_preferred(&[Cellulosic, Natural]),
        UseCaseConfig::new(
            "curtains-drapery",
            "Curtains Drapery",
            Interior,
            "Lightness and softness with medium durability targets.",
            ScoreWeights::new(0.31, 0.2, 0.18, 0.13, 0.18),
        )
        .with_bias(&[(WeightLightness, 1.0), (Softness, 0.8), (Durability, 0.35)])
        .with_microplastic_ceiling(6.5)
        .with_preferred(&[Cellulosic, Natural]),
        // Technical
        UseCaseConfig::new(
            "workwear",
            "Workwear",
            Technical,
            "Highest durability and feasibility with low elasticity bias.",
            ScoreWeights::new(0.36, 0.12, 0.12, 0.13, 0.27),
        )
        .with_bias(&[(Durability, 1.0), (Elasticity, 0.1), (ThermalRegulation, 0.25)])
        .with_microplastic_ceiling(7.0)
        .with_preferred(&[Bast, Cellulosic])
        .with_discouraged(&[Protein]),
        UseCaseConfig::new(
            "medical-textiles",
            "Medical Textiles",
            Technical,
            "Durability and low microplastic profile with medium circularity.",
            ScoreWeights::new(0.34, 0.2, 0.18, 0.08, 0.2),
        )
        .with_bias(&[(Durability, 0.8), (Softness, 0.35), (Breathability, 0.25)])
        .with_microplastic_ceiling(4.5)
        .with_recyclable_min(5.5)
        .with_low_microplastic_bonus(6.0)
        .with_preferred(&[Cellulosic, Natural])
        .with_discouraged(&[Synthetic]),
        UseCaseConfig::new(
            "automotive-textiles",
            "Automotive Textiles",
            Technical,
            "High durability and feasibility, medium cost pressure.",
            ScoreWeights::new(0.34, 0.13, 0.12, 0.17, 0.24),
        )
        .with_bias(&[(Durability, 1.0), (ThermalRegulation, 0.25), (WeightLightness, 0.3)])
        .with_microplastic_ceiling(7.5)
        .with_preferred(&[Cellulosic, Biopolymer]),
        // Sustainability
        UseCaseConfig::new(
            "circular-design",
            "Circular Design",
            Sustainability,
            "Max circularity profile with strict monomaterial and no-elastane constraints.",
            ScoreWeights::new(0.2, 0.25, 0.37, 0.07, 0.11),
        )
        .with_bias(&[(Durability, 0.35), (Breathability, 0.2)])
        .with_recyclable_min(6.0)
        .with_microplastic_ceiling(4.5)
        .excluding_elastane()
        .preferring_monomaterial()
        .with_monomaterial_bonus(8.0)
        .with_low_microplastic_bonus(8.0)
        .with_preferred(&[Cellulosic, Bast, Natural])
        .with_discouraged(&[Synthetic]),
        UseCaseConfig::new(
            "biodegradable-products",
            "Biodegradable Products",
            Sustainability,
            "High circularity profile discouraging synthetics with capped microplastic risk.",
            ScoreWeights::new(0.24, 0.28, 0.28, 0.08, 0.12),
        )
        .with_bias(&[(Softness, 0.25), (Breathability, 0.2), (Durability, 0.3)])
        .with_microplastic_ceiling(4.8)
        .with_recyclable_min(6.0)
        .with_low_microplastic_bonus(7.0)
        .with_preferred(&[Natural, Cellulosic, Bast])
        .with_discouraged(&[Synthetic, Biopolymer]),
    ]
}
