//! Utility modules for blend scoring
//!
//! Contains shared functionality used across the scoring pipeline:
//! - Normalization: slider/weight defaults, clamping, fixed-point rounding
//! - Similarity: cosine similarity and weighted closeness over metric vectors
//! - PRNG: input hashing and the deterministic generator seeded from it

pub mod normalization;
pub mod prng;
pub mod similarity;

// Re-export commonly used items
pub use normalization::{
    clamp, cost_to_score, mean, normalize_sliders, normalize_weights, round_to, to_ten_scale,
};
pub use prng::{input_seed, string_seed, Mulberry32, UnitRng};
pub use similarity::{cosine_similarity, weighted_closeness};
