//! Engine error taxonomy

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Too few materials survive constraint filtering to build blends
    #[error("Not enough materials after applying constraints: {remaining} remaining, {required} required")]
    InsufficientCatalog { remaining: usize, required: usize },

    /// A use-case registry that cannot resolve a default profile
    #[error("Invalid use-case registry: {0}")]
    InvalidRegistry(String),

    /// Tunables that would leave the generator without materials or candidates
    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("Unknown re-rank objective '{0}' (expected min_co2, min_cost or max_durability)")]
    UnknownObjective(String),
}
