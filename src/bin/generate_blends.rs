// Generate ranked blend candidates for one session
//
// Usage: cargo run --bin generate_blends -- <session.json> [--catalog <catalog.json>]
//        [--config <engine.json>] [--objective min_co2|min_cost|max_durability]

use anyhow::{Context, Result};
use blend_scorer_rust::{
    detect_conflicts, rerank_by_objective, BlendScorer, Candidate, Catalog, EngineConfig, Objective, SessionInput,
};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Args {
    session: PathBuf,
    catalog: Option<PathBuf>,
    config: Option<PathBuf>,
    objective: Option<Objective>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut session = None;
    let mut catalog = None;
    let mut config = None;
    let mut objective = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--catalog" => catalog = Some(PathBuf::from(args.next().context("--catalog needs a path")?)),
            "--config" => config = Some(PathBuf::from(args.next().context("--config needs a path")?)),
            "--objective" => {
                let name = args.next().context("--objective needs a name")?;
                objective = Some(name.parse::<Objective>()?);
            }
            _ if session.is_none() => session = Some(PathBuf::from(arg)),
            other => anyhow::bail!("Unexpected argument: {}", other),
        }
    }

    Ok(Args {
        session: session.context("Usage: generate_blends <session.json> [--catalog <path>] [--config <path>] [--objective <name>]")?,
        catalog,
        config,
        objective,
    })
}

fn print_candidates(title: &str, candidates: &[Candidate]) {
    println!("\n{}", "=".repeat(70));
    println!("{}", title);
    println!("{}", "=".repeat(70));

    for c in candidates {
        let composition: Vec<String> = c.composition.iter().map(|p| format!("{}% {}", p.pct, p.name)).collect();
        println!("\n#{}  score {:.4}  overall {:.1}/100", c.rank, c.score, c.scores.overall_0_100);
        println!("  {}", composition.join(" + "));
        println!(
            "  performance {:.1}  sustainability {:.1}  feasibility {:.1}",
            c.scores.performance_0_10, c.scores.sustainability_0_10, c.scores.feasibility_0_10
        );
        println!(
            "  circularity {:.1}/10 ({:?})  TRL {:.1}  supply risk {}",
            c.circularity.circularity_score,
            c.circularity.eol_pathway,
            c.feasibility.trl_est,
            c.feasibility.supply_risk.as_str()
        );
        println!(
            "  CO2 {:.2} kg/kg  water {:.0} L/kg  energy {:.1} MJ/kg",
            c.predicted_lca.co2_kg_per_kg, c.predicted_lca.water_l_per_kg, c.predicted_lca.energy_mj_per_kg
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blend_scorer_rust=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args()?;

    let contents = fs::read_to_string(&args.session)
        .with_context(|| format!("Failed to read session input: {:?}", args.session))?;
    let input: SessionInput =
        serde_json::from_str(&contents).with_context(|| "Failed to parse session input JSON")?;

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::reference()?,
    };
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    tracing::info!("Loaded {} materials", catalog.len());

    let scorer = BlendScorer::new().with_config(config)?;
    let use_case = scorer.registry().resolve(&input);
    println!("Use case: {} ({})", use_case.label, use_case.category.label());

    let warnings = detect_conflicts(&input.sliders);
    if !warnings.is_empty() {
        println!("\nTarget conflicts:");
        for w in &warnings {
            println!("  [{}] {}: {}", w.severity.as_str(), w.title, w.detail);
        }
    }

    let start = Instant::now();
    let candidates = scorer.generate(&input, catalog.materials())?;
    tracing::info!("Generated {} candidates in {:?}", candidates.len(), start.elapsed());
    print_candidates("RANKED CANDIDATES", &candidates);

    if let Some(objective) = args.objective {
        let reranked = rerank_by_objective(&candidates, objective);
        print_candidates(&format!("RE-RANKED BY {}", objective), &reranked);
    }

    if let Some(top) = candidates.first() {
        match scorer.suggest_more_recyclable_alternative(&input, top, catalog.materials())? {
            Some(alternative) => print_candidates("RECYCLABLE ALTERNATIVE", std::slice::from_ref(&alternative)),
            None => println!("\nNo more recyclable alternative with comparable performance."),
        }
    }

    Ok(())
}
