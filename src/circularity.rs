//! Circularity Evaluator
//!
//! End-of-life assessment of a composition on 0-10 scales.
//!
//! Inputs:
//! - Synthetic share: Synthetic + BioPolymer percentage
//! - Elastomer share: elastane / spandex / lycra / TPU percentage
//! - Microplastic scale: share-weighted risk class (low=2, medium=5, high=9)
//!
//! Outputs:
//! - separation_difficulty = components×2 + synthetic×0.05 + elastomer×0.12
//! - recyclability_score = predicted recyclability / 10, minus an elastomer penalty
//! - circularity_score = recyclability×0.5 + (10−separation)×0.3 + (10−microplastic)×0.2
//! - eol_pathway from a first-match decision list
//!
//! Every intermediate is rounded to one decimal before the next comparison.

use crate::data::{CompositionPart, MaterialLookup};
use crate::metrics::{Metric, MetricVector};
use crate::utils::{clamp, round_to};
use serde::{Deserialize, Serialize};

/// Elastomer share at or above which the heavy recyclability penalty applies
const ELASTOMER_HEAVY_PCT: f64 = 8.0;
const ELASTOMER_HEAVY_PENALTY: f64 = 2.5;
const ELASTOMER_LIGHT_PENALTY: f64 = 1.2;

pub const NOTE_ELASTOMER_HEAVY: &str = "Elastomer fraction significantly reduces recyclable pathways.";
pub const NOTE_ELASTOMER_LIGHT: &str = "Small elastomer fraction introduces separation complexity.";
pub const NOTE_MULTI_MATERIAL: &str = "Multi-material blend may require advanced sorting/separation.";
pub const NOTE_VIABLE: &str = "Blend has viable circular pathways with moderate processing requirements.";

/// Predicted end-of-life disposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EolPathway {
    MechanicalRecycling,
    ChemicalRecycling,
    IndustrialCompost,
    LandfillRisk,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularityAssessment {
    pub recyclability_score: f64,
    pub separation_difficulty: f64,
    pub microplastic_risk: f64,
    pub eol_pathway: EolPathway,
    pub circularity_score: f64,
    /// Never empty
    pub notes: Vec<String>,
}

/// Share totals (percent, 0-100) accumulated over the known parts of a composition
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompositionShares {
    pub synthetic_pct: f64,
    pub elastomer_pct: f64,
    /// Share-weighted microplastic scale (0-10), unrounded
    pub microplastic_scale: f64,
    /// Parts with a positive percentage
    pub components: usize,
}

impl CompositionShares {
    pub fn measure(composition: &[CompositionPart], lookup: &MaterialLookup) -> Self {
        let mut shares = CompositionShares {
            components: composition.iter().filter(|p| p.pct > 0).count(),
            ..Default::default()
        };

        for part in composition {
            let Some(material) = lookup.get(&part.material_id) else {
                continue;
            };
            if material.category.is_polymer() {
                shares.synthetic_pct += part.pct as f64;
            }
            if material.is_elastomer() {
                shares.elastomer_pct += part.pct as f64;
            }
            shares.microplastic_scale += material.constraints.microplastic_risk.circularity_scale() * part.share();
        }

        shares
    }
}

pub fn evaluate_circularity(
    composition: &[CompositionPart],
    lookup: &MaterialLookup,
    predicted: &MetricVector,
) -> CircularityAssessment {
    let shares = CompositionShares::measure(composition, lookup);
    let mut notes = Vec::new();

    let separation_difficulty = clamp(
        round_to(
            shares.components as f64 * 2.0 + shares.synthetic_pct * 0.05 + shares.elastomer_pct * 0.12,
            1,
        ),
        0.0,
        10.0,
    );
    let microplastic_risk = clamp(round_to(shares.microplastic_scale, 1), 0.0, 10.0);

    let mut recyclability_score = round_to(predicted[Metric::Recyclability] / 10.0, 1);
    if shares.elastomer_pct >= ELASTOMER_HEAVY_PCT {
        recyclability_score = round_to(recyclability_score - ELASTOMER_HEAVY_PENALTY, 1).max(0.0);
        notes.push(NOTE_ELASTOMER_HEAVY.to_string());
    } else if shares.elastomer_pct > 0.0 {
        recyclability_score = round_to(recyclability_score - ELASTOMER_LIGHT_PENALTY, 1).max(0.0);
        notes.push(NOTE_ELASTOMER_LIGHT.to_string());
    }

    if shares.components >= 3 {
        notes.push(NOTE_MULTI_MATERIAL.to_string());
    }

    let eol_pathway = classify_pathway(
        predicted[Metric::Biodegradability],
        recyclability_score,
        separation_difficulty,
        microplastic_risk,
        &shares,
    );

    let circularity_score = clamp(
        round_to(
            recyclability_score * 0.5 + (10.0 - separation_difficulty) * 0.3 + (10.0 - microplastic_risk) * 0.2,
            1,
        ),
        0.0,
        10.0,
    );

    if notes.is_empty() {
        notes.push(NOTE_VIABLE.to_string());
    }

    CircularityAssessment {
        recyclability_score,
        separation_difficulty,
        microplastic_risk,
        eol_pathway,
        circularity_score,
        notes,
    }
}

/// First matching rule wins
fn classify_pathway(
    biodegradability: f64,
    recyclability: f64,
    separation: f64,
    microplastic: f64,
    shares: &CompositionShares,
) -> EolPathway {
    if biodegradability >= 75.0 && shares.synthetic_pct < 25.0 && microplastic <= 4.0 {
        EolPathway::IndustrialCompost
    } else if recyclability >= 7.0 && separation <= 5.0 {
        EolPathway::MechanicalRecycling
    } else if recyclability >= 6.0 && shares.synthetic_pct >= 50.0 {
        EolPathway::ChemicalRecycling
    } else if shares.elastomer_pct > 0.0 || separation >= 7.5 {
        EolPathway::LandfillRisk
    } else {
        EolPathway::Unknown
    }
}
