//! Engine tunables
//!
//! Defaults reproduce the reference scoring behavior exactly. A JSON file may
//! override any subset of fields.

use crate::error::EngineError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Compositions synthesized (and returned) per call
    pub candidate_count: usize,
    /// Fewer eligible materials than this fails the call
    pub min_materials: usize,
    /// Bounds of the similarity-ranked top set the generator rotates through
    pub top_set_min: usize,
    pub top_set_max: usize,
    /// Blend of weighted closeness and use-case objective
    pub closeness_weight: f64,
    pub objective_weight: f64,
    pub high_supply_risk_penalty: f64,
    pub low_trl_threshold: f64,
    pub low_trl_penalty: f64,
    /// Penalty per circularity point below 10
    pub circularity_gap_penalty: f64,
    pub landfill_penalty: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            candidate_count: 6,
            min_materials: 3,
            top_set_min: 8,
            top_set_max: 14,
            closeness_weight: 0.55,
            objective_weight: 0.45,
            high_supply_risk_penalty: 0.08,
            low_trl_threshold: 6.0,
            low_trl_penalty: 0.05,
            circularity_gap_penalty: 0.012,
            landfill_penalty: 0.06,
        }
    }
}

impl EngineConfig {
    /// Load overrides from a JSON file; absent fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config: {:?}", path))?;

        let config: EngineConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse engine config JSON")?;

        config.validate()?;

        Ok(config)
    }

    /// Reject tunables that leave the top set or the candidate list empty
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.candidate_count == 0 {
            return Err(EngineError::InvalidConfig("candidate_count must be at least 1".to_string()));
        }
        if self.top_set_max == 0 {
            return Err(EngineError::InvalidConfig("top_set_max must be at least 1".to_string()));
        }
        if self.top_set_min > self.top_set_max {
            return Err(EngineError::InvalidConfig(format!(
                "top_set_min ({}) exceeds top_set_max ({})",
                self.top_set_min, self.top_set_max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"landfill_penalty": 0.1}"#).unwrap();
        assert_eq!(config.landfill_penalty, 0.1);
        assert_eq!(config.candidate_count, 6);
        assert_eq!(config.closeness_weight, 0.55);
    }

    #[test]
    fn test_load_rejects_inverted_top_set() {
        let dir = std::env::temp_dir().join(format!("blend_scorer_cfg_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("engine.json");
        fs::write(&path, r#"{"top_set_min": 20, "top_set_max": 10}"#).unwrap();

        let err = EngineConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("top_set_min"));

        fs::write(&path, r#"{"candidate_count": 4}"#).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap().candidate_count, 4);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_validate_rejects_empty_shapes() {
        assert!(EngineConfig::default().validate().is_ok());

        let no_candidates = EngineConfig {
            candidate_count: 0,
            ..Default::default()
        };
        let empty_top = EngineConfig {
            top_set_min: 0,
            top_set_max: 0,
            ..Default::default()
        };
        let inverted = EngineConfig {
            top_set_min: 9,
            top_set_max: 4,
            ..Default::default()
        };
        for config in [no_candidates, empty_top, inverted] {
            assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
        }

        // a small top set is fine
        let single = EngineConfig {
            top_set_min: 0,
            top_set_max: 1,
            ..Default::default()
        };
        assert!(single.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_empty_top_set() {
        let dir = std::env::temp_dir().join(format!("blend_scorer_cfg_empty_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("engine.json");
        fs::write(&path, r#"{"top_set_min": 0, "top_set_max": 0}"#).unwrap();

        let err = EngineConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("top_set_max"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = EngineConfig::load(Path::new("/nonexistent/engine.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("engine.json"));
    }
}
