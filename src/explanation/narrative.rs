use crate::data::CompositionPart;
use crate::explanation::types::CandidateNarrative;
use crate::metrics::{Metric, MetricVector};
use crate::predictor::Feasibility;

const MANUFACTURING_NOTES: [&str; 3] = [
    "Recommended yarn trial with medium twist before knitting/weaving selection.",
    "Run wash-cycle test for handfeel stabilization and dimensional stability.",
    "Validate finishing chemistry compatibility with primary cellulosic fraction.",
];

const STANDING_RISKS: [&str; 2] = [
    "Pilot-lot variability possible on additive component.",
    "Confirm conversion yield at industrial scale before procurement.",
];

/// "60% Hemp + 30% Lyocell + 10% PLA Fiber"
pub fn composition_text(composition: &[CompositionPart]) -> String {
    composition
        .iter()
        .map(|p| format!("{}% {}", p.pct, p.name))
        .collect::<Vec<_>>()
        .join(" + ")
}

pub fn build_narrative(
    composition: &[CompositionPart],
    properties: &MetricVector,
    feasibility: &Feasibility,
) -> CandidateNarrative {
    let explanation = format!(
        "Blend {}. Balanced toward durability {:.0} and breathability {:.0} with estimated TRL {:.1}.",
        composition_text(composition),
        properties[Metric::Durability],
        properties[Metric::Breathability],
        feasibility.trl_est
    );

    let mut risks = vec![format!("Supply risk flagged as {}.", feasibility.supply_risk.as_str())];
    risks.extend(STANDING_RISKS.iter().map(|r| r.to_string()));

    CandidateNarrative {
        explanation,
        manufacturing_notes: MANUFACTURING_NOTES.iter().map(|n| n.to_string()).collect(),
        risks,
    }
}

/// Explanation of a recyclability-oriented alternative to the candidate at `base_rank`
pub fn alternative_explanation(base_rank: usize, explanation: &str) -> String {
    format!("Recyclability-oriented alternative to candidate #{}. {}", base_rank, explanation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Catalog, RiskClass};

    #[test]
    fn test_explanation_text() {
        let catalog = Catalog::reference().unwrap();
        let composition = vec![
            CompositionPart::new(catalog.find("hemp").unwrap(), 60),
            CompositionPart::new(catalog.find("lyocell").unwrap(), 30),
            CompositionPart::new(catalog.find("pla-fiber").unwrap(), 10),
        ];
        let mut properties = MetricVector::neutral();
        properties[Metric::Durability] = 81.6;
        properties[Metric::Breathability] = 79.4;
        let feasibility = Feasibility {
            trl_est: 8.2,
            supply_risk: RiskClass::Medium,
        };

        let narrative = build_narrative(&composition, &properties, &feasibility);
        assert_eq!(
            narrative.explanation,
            "Blend 60% Hemp + 30% Lyocell + 10% PLA Fiber. Balanced toward durability 82 and breathability 79 with estimated TRL 8.2."
        );
        assert_eq!(narrative.manufacturing_notes.len(), 3);
        assert_eq!(narrative.risks[0], "Supply risk flagged as medium.");
        assert_eq!(narrative.risks.len(), 3);
    }

    #[test]
    fn test_alternative_prefix() {
        assert_eq!(
            alternative_explanation(2, "Blend 100% Hemp."),
            "Recyclability-oriented alternative to candidate #2. Blend 100% Hemp."
        );
    }
}
