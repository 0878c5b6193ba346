//! Derived operations over generated candidates and the catalog
//!
//! - Re-ranking by a single objective (pure, no catalog access)
//! - Nearest catalog materials by cosine similarity
//! - A more recyclable alternative to an existing candidate, found by
//!   re-running generation with recyclability-leaning weights

use crate::data::{Material, RiskClass};
use crate::error::EngineError;
use crate::explanation::alternative_explanation;
use crate::metrics::{Metric, PERFORMANCE_METRICS};
use crate::scorer::{sort_and_rank, BlendScorer, Candidate};
use crate::session::{GenerateConstraints, SessionInput};
use crate::utils::{cosine_similarity, mean, normalize_weights, round_to};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Share of the re-ranked score taken from the objective bonus
const OBJECTIVE_BLEND: f64 = 0.2;

pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

/// Raw weights forced onto the end-of-life metrics when looking for an alternative
const ALTERNATIVE_WEIGHT_BOOST: [(Metric, f64); 3] = [
    (Metric::Recyclability, 4.0),
    (Metric::Biodegradability, 2.5),
    (Metric::MicroplasticRisk, 2.5),
];
/// Circularity points an alternative must gain over the base candidate
const MIN_CIRCULARITY_GAIN: f64 = 0.4;
/// Largest mean absolute performance difference an alternative may have
const MAX_PERFORMANCE_GAP: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    MinCo2,
    MinCost,
    MaxDurability,
}

impl Objective {
    pub fn as_str(self) -> &'static str {
        match self {
            Objective::MinCo2 => "min_co2",
            Objective::MinCost => "min_cost",
            Objective::MaxDurability => "max_durability",
        }
    }

    /// Objective bonus, roughly 0-1
    pub fn bonus(self, candidate: &Candidate) -> f64 {
        match self {
            Objective::MinCo2 => (100.0 - candidate.predicted_lca.co2_kg_per_kg * 10.0) / 100.0,
            Objective::MinCost => candidate.predicted_properties[Metric::Cost] / 100.0,
            Objective::MaxDurability => candidate.predicted_properties[Metric::Durability] / 100.0,
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Objective {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "min_co2" => Ok(Objective::MinCo2),
            "min_cost" => Ok(Objective::MinCost),
            "max_durability" => Ok(Objective::MaxDurability),
            _ => Err(EngineError::UnknownObjective(s.to_string())),
        }
    }
}

/// Re-score as 0.8 × score + 0.2 × bonus, then re-sort and re-rank
///
/// Same length as the input; the input is left untouched.
pub fn rerank_by_objective(candidates: &[Candidate], objective: Objective) -> Vec<Candidate> {
    let mut reranked: Vec<Candidate> = candidates
        .iter()
        .map(|candidate| {
            let score = (1.0 - OBJECTIVE_BLEND) * candidate.score + OBJECTIVE_BLEND * objective.bonus(candidate);
            Candidate {
                score: round_to(score, 4),
                ..candidate.clone()
            }
        })
        .collect();

    sort_and_rank(&mut reranked);
    reranked
}

/// Up to `limit` other materials most similar to `material_id`
///
/// Empty when the id is not in the catalog.
pub fn find_similar_materials<'a>(catalog: &'a [Material], material_id: &str, limit: usize) -> Vec<&'a Material> {
    let Some(source) = catalog.iter().find(|m| m.id == material_id) else {
        return Vec::new();
    };

    let mut scored: Vec<(&'a Material, f64)> = catalog
        .iter()
        .filter(|m| m.id != material_id)
        .map(|m| (m, cosine_similarity(&source.properties, &m.properties)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    scored.into_iter().take(limit).map(|(m, _)| m).collect()
}

/// Mean absolute difference over the performance metrics
fn performance_gap(a: &Candidate, b: &Candidate) -> f64 {
    let diffs: Vec<f64> = PERFORMANCE_METRICS
        .iter()
        .map(|&metric| (a.predicted_properties[metric] - b.predicted_properties[metric]).abs())
        .collect();
    mean(&diffs)
}

/// Session input leaning toward end-of-life outcomes, capped at medium microplastic risk
fn recyclability_session(input: &SessionInput) -> SessionInput {
    let mut raw = input.weights.clone().unwrap_or_default();
    raw.extend(ALTERNATIVE_WEIGHT_BOOST);

    let constraints = GenerateConstraints {
        max_microplastic_risk: Some(RiskClass::Medium),
        ..input.constraints.clone().unwrap_or_default()
    };

    SessionInput {
        weights: Some(normalize_weights(Some(&raw)).to_partial()),
        constraints: Some(constraints),
        ..input.clone()
    }
}

impl BlendScorer {
    /// A candidate with clearly better circularity and similar performance
    ///
    /// Returns `Ok(None)` when no regenerated candidate gains more than 0.4
    /// circularity points while staying within 16 points of mean performance.
    pub fn suggest_more_recyclable_alternative(
        &self,
        input: &SessionInput,
        base: &Candidate,
        catalog: &[Material],
    ) -> Result<Option<Candidate>, EngineError> {
        let candidates = self.generate(&recyclability_session(input), catalog)?;
        let base_circularity = base.circularity.circularity_score;

        let mut qualified: Vec<(Candidate, f64, f64)> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let gain = candidate.circularity.circularity_score - base_circularity;
                let gap = performance_gap(&candidate, base);
                (gain > MIN_CIRCULARITY_GAIN && gap <= MAX_PERFORMANCE_GAP).then_some((candidate, gain, gap))
            })
            .collect();

        tracing::debug!(
            base_rank = base.rank,
            qualified = qualified.len(),
            "Searched for recyclable alternatives"
        );

        qualified.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal))
        });

        Ok(qualified.into_iter().next().map(|(candidate, _, _)| Candidate {
            explanation: alternative_explanation(base.rank, &candidate.explanation),
            ..candidate
        }))
    }
}

/// [`BlendScorer::suggest_more_recyclable_alternative`] with default tunables
pub fn suggest_more_recyclable_alternative(
    input: &SessionInput,
    base: &Candidate,
    catalog: &[Material],
) -> Result<Option<Candidate>, EngineError> {
    BlendScorer::new().suggest_more_recyclable_alternative(input, base, catalog)
}
