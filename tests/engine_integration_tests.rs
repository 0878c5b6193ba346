// Engine integration tests
//
// Purpose: end-to-end properties of generation, re-ranking, similarity and
// alternative search against the built-in reference catalog
// Run with: cargo test --test engine_integration_tests

use blend_scorer_rust::data::MaterialFamily;
use blend_scorer_rust::use_cases::ScoreWeights;
use blend_scorer_rust::utils::{cosine_similarity, input_seed, Mulberry32};
use blend_scorer_rust::{
    evaluate_circularity, find_similar_materials, generate_candidates, predict_blend, rerank_by_objective,
    suggest_more_recyclable_alternative, BlendScorer, Candidate, Catalog, CompositionPart, EngineError,
    GenerateConstraints, Metric, MetricVector, Objective, RiskClass, SessionInput, UseCaseCategory, UseCaseConfig,
    UseCaseRegistry,
};
use std::collections::HashSet;

fn reference() -> Catalog {
    Catalog::reference().expect("reference catalog parses")
}

fn denim() -> SessionInput {
    SessionInput::new("Denim").with_slider(Metric::Durability, 80.0)
}

/// A spread of sessions touching every built-in profile
fn sessions() -> Vec<SessionInput> {
    UseCaseRegistry::builtin()
        .all()
        .iter()
        .enumerate()
        .map(|(i, config)| {
            SessionInput::new("")
                .with_use_case_id(config.id.clone())
                .with_slider(Metric::Durability, 40.0 + (i % 5) as f64 * 12.0)
                .with_slider(Metric::Softness, 90.0 - (i % 4) as f64 * 15.0)
                .with_weight(Metric::Recyclability, 1.0 + (i % 3) as f64)
        })
        .collect()
}

fn assert_well_formed(candidates: &[Candidate]) {
    assert!((3..=6).contains(&candidates.len()));
    for (i, c) in candidates.iter().enumerate() {
        assert_eq!(c.rank, i + 1);
        assert_eq!(c.composition.iter().map(|p| p.pct).sum::<i32>(), 100);

        let ids: HashSet<&str> = c.composition.iter().map(|p| p.material_id.as_str()).collect();
        assert_eq!(ids.len(), c.composition.len(), "duplicate material in {:?}", c.composition);

        let circ = &c.circularity;
        for value in [
            circ.circularity_score,
            circ.recyclability_score,
            circ.separation_difficulty,
            circ.microplastic_risk,
            c.scores.performance_0_10,
            c.scores.sustainability_0_10,
            c.scores.feasibility_0_10,
        ] {
            assert!((0.0..=10.0).contains(&value), "{} out of [0, 10]", value);
        }
        assert!((0.0..=100.0).contains(&c.scores.overall_0_100));
        for (_, value) in c.predicted_properties.iter() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
    assert!(candidates.windows(2).all(|w| w[0].score >= w[1].score));
}

// =========================================================================
// Generation
// =========================================================================

#[test]
fn test_denim_example_scenario() {
    let catalog = reference();
    let families: HashSet<MaterialFamily> = catalog.materials().iter().map(|m| m.family()).collect();
    assert!(catalog.len() >= 5);
    assert!(families.contains(&MaterialFamily::Bast));
    assert!(families.contains(&MaterialFamily::Cellulosic));

    let candidates = generate_candidates(&denim(), catalog.materials()).unwrap();
    assert_eq!(candidates.len(), 6);
    assert_well_formed(&candidates);
    assert!(candidates[0].predicted_properties[Metric::Durability] >= 60.0);
}

#[test]
fn test_every_profile_yields_well_formed_candidates() {
    let catalog = reference();
    for input in sessions() {
        let candidates = generate_candidates(&input, catalog.materials()).unwrap();
        assert_well_formed(&candidates);
    }
}

#[test]
fn test_generation_is_byte_identical_across_calls() {
    let catalog = reference();
    for input in sessions().iter().take(5) {
        let first = serde_json::to_string(&generate_candidates(input, catalog.materials()).unwrap()).unwrap();
        let second = serde_json::to_string(&generate_candidates(input, catalog.materials()).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_degenerate_input_still_generates() {
    let catalog = reference();
    // unknown use case, no sliders, no weights
    let input = SessionInput::new("Underwater basket weaving");
    let candidates = generate_candidates(&input, catalog.materials()).unwrap();
    assert_eq!(candidates.len(), 6);
    assert_well_formed(&candidates);
}

#[test]
fn test_insufficient_catalog_is_reported() {
    let catalog = reference();

    // two eligible materials
    let tiny: Vec<_> = catalog
        .materials()
        .iter()
        .filter(|m| m.id == "hemp" || m.id == "lyocell")
        .cloned()
        .collect();
    assert_eq!(
        generate_candidates(&denim(), &tiny).unwrap_err(),
        EngineError::InsufficientCatalog { remaining: 2, required: 3 }
    );

    // no animal fibers and biodegradable-only still leaves plenty
    let strict = denim().with_constraints(GenerateConstraints {
        must_biodegradable: true,
        no_animal_fibers: true,
        max_microplastic_risk: Some(RiskClass::Low),
        max_cost: None,
    });
    let candidates = generate_candidates(&strict, catalog.materials()).unwrap();
    for c in &candidates {
        for part in &c.composition {
            let material = catalog.find(&part.material_id).unwrap();
            assert_eq!(material.constraints.microplastic_risk, RiskClass::Low);
            assert!(!material.constraints.animal_fiber);
        }
    }
}

#[test]
fn test_batch_matches_sequential() {
    let catalog = reference();
    let scorer = BlendScorer::new();
    let inputs = sessions();

    let batch = scorer.generate_batch(&inputs, catalog.materials());
    assert_eq!(batch.len(), inputs.len());
    for (input, result) in inputs.iter().zip(batch) {
        assert_eq!(result, scorer.generate(input, catalog.materials()));
    }
}

#[test]
fn test_weight_increase_does_not_lower_metric_in_top_candidate() {
    // Water is flat across the catalog, so favoring it only changes how much
    // the durability gap counts.
    let mut materials = reference().materials().to_vec();
    for m in &mut materials {
        m.properties[Metric::Water] = 50.0;
    }
    let plain = UseCaseConfig::new(
        "plain",
        "Plain",
        UseCaseCategory::Technical,
        "No bias, no constraints",
        ScoreWeights::new(1.0, 1.0, 1.0, 1.0, 1.0),
    );
    let scorer = BlendScorer::new().with_registry(UseCaseRegistry::new(vec![plain], "plain").unwrap());

    let base = SessionInput::new("plain").with_slider(Metric::Durability, 100.0);
    let favor_durability = base.clone().with_weight(Metric::Durability, 50.0);
    let favor_water = base.clone().with_weight(Metric::Water, 50.0);

    for seed in [1, 7, 42, input_seed(&base)] {
        // same compositions in both runs
        let run = |input: &SessionInput| {
            let mut rng = Mulberry32::new(seed);
            scorer.generate_with_rng(input, &materials, &mut rng).unwrap()
        };
        let durable = run(&favor_durability);
        let watery = run(&favor_water);

        assert!(
            durable[0].predicted_properties[Metric::Durability]
                >= watery[0].predicted_properties[Metric::Durability]
        );
    }
}

// =========================================================================
// Prediction edge cases
// =========================================================================

#[test]
fn test_missing_material_is_skipped_silently() {
    let catalog = reference();
    let lookup = catalog.lookup();
    let hemp = catalog.find("hemp").unwrap();

    let composition = vec![
        CompositionPart::new(hemp, 70),
        CompositionPart {
            material_id: "discontinued-fiber".to_string(),
            name: "Discontinued Fiber".to_string(),
            pct: 30,
        },
    ];
    let prediction = predict_blend(&composition, &lookup);
    assert!(!prediction.is_complete());
    assert_eq!(prediction.skipped_material_ids, vec!["discontinued-fiber".to_string()]);
    // only 70% of hemp contributes
    let expected = (hemp.properties[Metric::Breathability] * 0.7 * 10.0).round() / 10.0;
    assert!((prediction.properties[Metric::Breathability] - expected).abs() < 1e-9);
}

// =========================================================================
// Derived operations
// =========================================================================

#[test]
fn test_cosine_self_similarity() {
    let catalog = reference();
    for m in catalog.materials() {
        let sim = cosine_similarity(&m.properties, &m.properties);
        assert!((sim - 1.0).abs() < 1e-9);
    }
    assert_eq!(cosine_similarity(&MetricVector::zeros(), &MetricVector::splat(10.0)), 0.0);
}

#[test]
fn test_rerank_is_sorted_and_contiguous() {
    let catalog = reference();
    for input in sessions().iter().take(6) {
        let candidates = generate_candidates(input, catalog.materials()).unwrap();
        for objective in ["min_co2", "min_cost", "max_durability"] {
            let objective: Objective = objective.parse().unwrap();
            let reranked = rerank_by_objective(&candidates, objective);
            assert_eq!(reranked.len(), candidates.len());
            assert!(reranked.windows(2).all(|w| w[0].score >= w[1].score));
            assert!(reranked.iter().enumerate().all(|(i, c)| c.rank == i + 1));
        }
    }
}

#[test]
fn test_find_similar_respects_limit() {
    let catalog = reference();
    for m in catalog.materials() {
        let similar = find_similar_materials(catalog.materials(), &m.id, 3);
        assert_eq!(similar.len(), 3);
        assert!(similar.iter().all(|s| s.id != m.id));
    }
}

#[test]
fn test_alternative_for_elastane_heavy_base() {
    let catalog = reference();
    let lookup = catalog.lookup();
    let input = SessionInput::new("Sportswear")
        .with_slider(Metric::Elasticity, 90.0)
        .with_weight(Metric::Recyclability, 3.0)
        .with_weight(Metric::Biodegradability, 3.0);

    // hand-built high-elastane base, scored through the normal pipeline
    let mut base = generate_candidates(&input, catalog.materials()).unwrap().remove(0);
    base.composition = vec![
        CompositionPart::new(catalog.find("recycled-polyester").unwrap(), 70),
        CompositionPart::new(catalog.find("elastane").unwrap(), 30),
    ];
    let prediction = predict_blend(&base.composition, &lookup);
    base.circularity = evaluate_circularity(&base.composition, &lookup, &prediction.properties);
    base.predicted_properties = prediction.properties;

    if let Some(alternative) = suggest_more_recyclable_alternative(&input, &base, catalog.materials()).unwrap() {
        assert!(alternative.circularity.circularity_score > base.circularity.circularity_score);
        assert!(alternative.explanation.starts_with("Recyclability-oriented alternative to candidate #1. "));
        for part in &alternative.composition {
            let material = catalog.find(&part.material_id).unwrap();
            assert!(material.constraints.microplastic_risk <= RiskClass::Medium);
        }
    }
}
