//! Candidate explanations and target warnings
//!
//! - `narrative`: explanation, manufacturing notes and risk lines per candidate
//! - `conflicts`: warnings for slider combinations that are hard to satisfy together

pub mod conflicts;
pub mod narrative;
pub mod types;

pub use conflicts::detect_conflicts;
pub use narrative::{alternative_explanation, build_narrative};
pub use types::{CandidateNarrative, ConflictWarning, Severity};
