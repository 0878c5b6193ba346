//! Blend Scorer - Main coordinator for candidate generation
//!
//! Runs the full pipeline for one session input against a material catalog:
//!
//! 1. Resolve the use case; normalize sliders and weights; bias the weights
//! 2. Filter the catalog by caller constraints merged with the use case's
//! 3. Seed a Mulberry32 generator from the hash of the serialized input
//! 4. Synthesize candidate compositions
//! 5. Predict, evaluate circularity and score each candidate
//! 6. Sort by score and assign ranks 1..n
//!
//! Nothing is cached between calls. The catalog and registry are only read,
//! so independent sessions can be scored in parallel (see
//! [`BlendScorer::generate_batch`]).

use crate::circularity::{evaluate_circularity, CircularityAssessment, EolPathway};
use crate::config::EngineConfig;
use crate::data::{CompositionPart, Lca, Material, MaterialLookup, RiskClass};
use crate::error::EngineError;
use crate::explanation::build_narrative;
use crate::generator::CompositionGenerator;
use crate::metrics::{Metric, MetricGroup, MetricVector};
use crate::predictor::{predict_blend, Feasibility};
use crate::session::SessionInput;
use crate::use_cases::{
    adjust_weights_for_use_case, apply_use_case_penalties_and_bonuses, candidate_use_case_objective,
    merge_constraints, UseCaseConfig, UseCaseRegistry,
};
use crate::utils::{
    clamp, cost_to_score, input_seed, mean, normalize_sliders, normalize_weights, round_to, to_ten_scale,
    weighted_closeness, Mulberry32, UnitRng,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Scalability points per TRL level (TRL 9 ≈ 100)
const SCALABILITY_PER_TRL: f64 = 11.11;

/// Display-only scores; never used for ranking
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CompositeScores {
    pub performance_0_10: f64,
    pub sustainability_0_10: f64,
    pub feasibility_0_10: f64,
    pub overall_0_100: f64,
}

/// One fully scored composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// 1-based, contiguous after every sort
    pub rank: usize,
    /// Ranking score (4 decimals)
    pub score: f64,
    pub scores: CompositeScores,
    pub composition: Vec<CompositionPart>,
    pub predicted_properties: MetricVector,
    pub predicted_lca: Lca,
    pub feasibility: Feasibility,
    pub circularity: CircularityAssessment,
    pub explanation: String,
    pub manufacturing_notes: Vec<String>,
    pub risks: Vec<String>,
}

/// Sort by score descending (stable) and reassign ranks 1..n
pub fn sort_and_rank(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    for (i, candidate) in candidates.iter_mut().enumerate() {
        candidate.rank = i + 1;
    }
}

/// Performance / sustainability group means and a feasibility blend
///
/// feasibility_raw = 0.6 × mean(scalability, cost) + 0.4 × TRL/9 × 100
/// overall = 0.45 × performance + 0.35 × sustainability + 0.20 × feasibility_raw
pub fn compute_composite_scores(properties: &MetricVector, feasibility: &Feasibility) -> CompositeScores {
    let performance = properties.group_mean(MetricGroup::Performance);
    let sustainability = properties.group_mean(MetricGroup::Sustainability);
    let feasibility_raw = mean(&[properties[Metric::Scalability], properties[Metric::Cost]]) * 0.6
        + feasibility.trl_est / 9.0 * 100.0 * 0.4;
    let overall = performance * 0.45 + sustainability * 0.35 + feasibility_raw * 0.2;

    CompositeScores {
        performance_0_10: to_ten_scale(performance),
        sustainability_0_10: to_ten_scale(sustainability),
        feasibility_0_10: to_ten_scale(feasibility_raw),
        overall_0_100: clamp(round_to(overall, 1), 0.0, 100.0),
    }
}

/// Share-weighted midpoint cost (EUR/kg) over parts present in `lookup`
pub fn average_cost(composition: &[CompositionPart], lookup: &MaterialLookup) -> f64 {
    composition
        .iter()
        .filter_map(|part| lookup.get(&part.material_id).map(|m| m.mid_cost() * part.share()))
        .sum()
}

/// Normalized session context shared by every candidate of one call
struct ScoringContext<'a> {
    use_case: &'a UseCaseConfig,
    target: MetricVector,
    weights: MetricVector,
    lookup: MaterialLookup<'a>,
}

/// Main blend scorer
#[derive(Debug, Clone, Default)]
pub struct BlendScorer {
    config: EngineConfig,
    registry: UseCaseRegistry,
}

impl BlendScorer {
    /// Default tunables with the built-in use-case registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tunables; fails if [`EngineConfig::validate`] does
    pub fn with_config(mut self, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_registry(mut self, registry: UseCaseRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &UseCaseRegistry {
        &self.registry
    }

    /// Generate ranked candidates, seeded from the input hash
    ///
    /// Identical input and catalog always give identical output.
    pub fn generate(&self, input: &SessionInput, catalog: &[Material]) -> Result<Vec<Candidate>, EngineError> {
        let seed = input_seed(input);
        let mut rng = Mulberry32::new(seed);
        tracing::debug!(seed, use_case = %input.use_case, "Seeded candidate generator");
        self.generate_with_rng(input, catalog, &mut rng)
    }

    /// Same pipeline with a caller-supplied generator
    pub fn generate_with_rng<R: UnitRng + ?Sized>(
        &self,
        input: &SessionInput,
        catalog: &[Material],
        rng: &mut R,
    ) -> Result<Vec<Candidate>, EngineError> {
        // Stage 1: resolve
        let use_case = self.registry.resolve(input);
        let target = normalize_sliders(&input.sliders);
        let weights = adjust_weights_for_use_case(&normalize_weights(input.weights.as_ref()), use_case);

        // Stage 2: filter
        let constraints = merge_constraints(input.constraints.as_ref(), use_case);
        let eligible: Vec<&Material> = catalog.iter().filter(|m| constraints.admits(m)).collect();
        let required = self.config.min_materials.max(1);
        if eligible.len() < required {
            tracing::debug!(
                use_case = %use_case.id,
                remaining = eligible.len(),
                required,
                "Constraint filtering left too few materials"
            );
            return Err(EngineError::InsufficientCatalog {
                remaining: eligible.len(),
                required,
            });
        }
        tracing::debug!(
            use_case = %use_case.id,
            eligible = eligible.len(),
            catalog = catalog.len(),
            "Filtered catalog"
        );

        // Stage 4: synthesize
        let generator = CompositionGenerator::new(
            &eligible,
            &target,
            self.config.top_set_min,
            self.config.top_set_max,
            use_case.constraints.no_elastane,
        );
        let compositions: Vec<Vec<CompositionPart>> = (0..self.config.candidate_count)
            .map(|i| generator.compose(i, &mut *rng))
            .collect();

        // Stage 5: score
        let context = ScoringContext {
            use_case,
            target,
            weights,
            lookup: MaterialLookup::new(eligible.iter().copied()),
        };
        let mut candidates: Vec<Candidate> = compositions
            .into_iter()
            .enumerate()
            .map(|(i, composition)| self.score_composition(i + 1, composition, &context))
            .collect();

        // Stage 6: finalize
        sort_and_rank(&mut candidates);
        candidates.truncate(self.config.candidate_count);

        tracing::debug!(
            use_case = %use_case.id,
            candidates = candidates.len(),
            top_score = candidates.first().map(|c| c.score).unwrap_or_default(),
            "Generated candidates"
        );

        Ok(candidates)
    }

    /// Generate for many sessions in parallel against one catalog
    ///
    /// Each result equals the corresponding sequential [`generate`](Self::generate) call.
    pub fn generate_batch(
        &self,
        inputs: &[SessionInput],
        catalog: &[Material],
    ) -> Vec<Result<Vec<Candidate>, EngineError>> {
        tracing::info!("Generating candidates for {} sessions", inputs.len());

        let results: Vec<Result<Vec<Candidate>, EngineError>> =
            inputs.par_iter().map(|input| self.generate(input, catalog)).collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            tracing::warn!("{} of {} sessions had too few eligible materials", failed, inputs.len());
        }
        results
    }

    fn score_composition(&self, rank: usize, composition: Vec<CompositionPart>, context: &ScoringContext) -> Candidate {
        let config = &self.config;
        let prediction = predict_blend(&composition, &context.lookup);

        let mut properties = prediction.properties;
        properties[Metric::Cost] = cost_to_score(average_cost(&composition, &context.lookup));
        properties[Metric::Scalability] =
            clamp(round_to(prediction.feasibility.trl_est * SCALABILITY_PER_TRL, 1), 0.0, 100.0);

        let circularity = evaluate_circularity(&composition, &context.lookup, &properties);
        let feasibility = prediction.feasibility;

        let closeness = weighted_closeness(&properties, &context.target, &context.weights);
        let objective = candidate_use_case_objective(&properties, &circularity, &feasibility, context.use_case);
        let mut score = closeness * config.closeness_weight + objective * config.objective_weight;

        if feasibility.supply_risk == RiskClass::High {
            score -= config.high_supply_risk_penalty;
        }
        if feasibility.trl_est < config.low_trl_threshold {
            score -= config.low_trl_penalty;
        }
        score -= (10.0 - circularity.circularity_score) * config.circularity_gap_penalty;
        if circularity.eol_pathway == EolPathway::LandfillRisk {
            score -= config.landfill_penalty;
        }
        score += apply_use_case_penalties_and_bonuses(&composition, &circularity, context.use_case, &context.lookup);

        let narrative = build_narrative(&composition, &properties, &feasibility);
        let scores = compute_composite_scores(&properties, &feasibility);

        Candidate {
            rank,
            score: round_to(score, 4),
            scores,
            composition,
            predicted_properties: properties,
            predicted_lca: prediction.lca,
            feasibility,
            circularity,
            explanation: narrative.explanation,
            manufacturing_notes: narrative.manufacturing_notes,
            risks: narrative.risks,
        }
    }
}

/// [`BlendScorer::generate`] with default tunables and the built-in registry
pub fn generate_candidates(input: &SessionInput, catalog: &[Material]) -> Result<Vec<Candidate>, EngineError> {
    BlendScorer::new().generate(input, catalog)
}
