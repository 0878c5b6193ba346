use serde::{Deserialize, Serialize};

/// Severity level for target warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Warning for slider targets that pull against each other
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictWarning {
    pub id: String,     // "elasticity-bio", "durability-lightness", "cost-co2"
    pub title: String,
    pub detail: String,
    pub severity: Severity,
}

/// Free-text fields attached to every candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateNarrative {
    pub explanation: String,
    pub manufacturing_notes: Vec<String>,
    pub risks: Vec<String>,
}
