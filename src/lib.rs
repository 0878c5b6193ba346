//! Blend Scorer Rust Implementation
//!
//! Deterministic candidate generation and scoring for textile fiber blends.
//!
//! Given a target property profile, per-metric weights, hard constraints and
//! a use-case context, the engine synthesizes candidate compositions from a
//! material catalog, predicts their properties, LCA and feasibility,
//! evaluates end-of-life circularity and ranks them by a multi-objective score.
//!
//! Module layout:
//! - `metrics/`: the 14-metric vocabulary and dense metric vectors
//! - `utils/`: normalization, similarity and the seeded PRNG
//! - `data`, `session`: catalog materials and per-call input
//! - `rules`, `predictor`, `circularity`: per-composition prediction
//! - `use_cases/`: use-case profiles and their weighting layer
//! - `generator`, `scorer`: composition synthesis and the ranking pipeline
//! - `derived`: re-ranking, similar materials, recyclable alternatives
//! - `explanation/`: candidate narratives and target conflict warnings

pub mod circularity;
pub mod config;
pub mod data;
pub mod derived;
pub mod error;
pub mod explanation;
pub mod generator;
pub mod metrics;
pub mod predictor;
pub mod rules;
pub mod scorer;
pub mod session;
pub mod use_cases;
pub mod utils;

// Re-export commonly used types
pub use circularity::{evaluate_circularity, CircularityAssessment, EolPathway};
pub use config::EngineConfig;
pub use data::{Catalog, CompositionPart, Lca, Material, MaterialCategory, MaterialLookup, RiskClass};
pub use derived::{find_similar_materials, rerank_by_objective, suggest_more_recyclable_alternative, Objective};
pub use error::EngineError;
pub use explanation::{detect_conflicts, ConflictWarning, Severity};
pub use metrics::{Metric, MetricGroup, MetricVector, PartialMetrics};
pub use predictor::{predict_blend, BlendPrediction, Feasibility};
pub use scorer::{generate_candidates, BlendScorer, Candidate, CompositeScores};
pub use session::{GenerateConstraints, SessionInput};
pub use use_cases::{UseCaseCategory, UseCaseConfig, UseCaseRegistry};
