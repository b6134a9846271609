//! Headless Rank Runner
//!
//! Ranks one turn for every unit of the acting side and prints the choices.

use std::path::PathBuf;

use clap::Parser;
use hex_tactician::ai::{load_behavior, stock_decisions, BehaviorSettings, RankingPass, TacticalEngine};
use hex_tactician::battle::{PathGenerator, ReachablePathGenerator};
use hex_tactician::core::error::Result;
use hex_tactician::core::EngineConfig;
use hex_tactician::scenario::{Scenario, ScenarioGenerator};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless Rank Runner - pick one turn of moves for a bot side
#[derive(Parser, Debug)]
#[command(name = "rank_runner")]
#[command(about = "Rank candidate paths for every bot unit and print the choices")]
struct Args {
    /// Scenario JSON file; a generated scenario is used when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Seed for the generated scenario
    #[arg(long)]
    seed: Option<u64>,

    /// Behavior profile name (loaded from data/behaviors/)
    #[arg(long, default_value = "default")]
    behavior: String,

    /// Engine config TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Operator command applied before ranking, e.g. "aggression 8"
    #[arg(long = "command")]
    commands: Vec<String>,

    /// Include score breakdowns
    #[arg(long)]
    trace: bool,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Runner-up candidates to list per unit
    #[arg(long, default_value_t = 3)]
    top: usize,

    /// Write the scenario used to this file
    #[arg(long)]
    dump_scenario: Option<PathBuf>,
}

#[derive(Serialize)]
struct RankedLine {
    decision: String,
    score: f64,
    path: String,
}

#[derive(Serialize)]
struct UnitResult {
    unit: String,
    name: String,
    candidates: usize,
    choice: Option<RankedLine>,
    runners_up: Vec<RankedLine>,
    trace: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hex_tactician=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => {
            let seed = args.seed.unwrap_or_else(rand::random);
            tracing::info!(seed, "generating scenario");
            ScenarioGenerator::new().generate(seed)
        }
    };
    if let Some(path) = &args.dump_scenario {
        scenario.save(path)?;
    }

    let behavior = load_behavior(&args.behavior).unwrap_or_else(|e| {
        tracing::warn!(profile = %args.behavior, error = %e, "failed to load behavior, using default");
        BehaviorSettings::default()
    });

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    config.trace |= args.trace;

    let engine = TacticalEngine::new(config, behavior)?;
    for command in &args.commands {
        engine.apply_command(command)?;
    }

    let decisions = stock_decisions(&engine.behavior().decisions);
    let generator = ReachablePathGenerator;
    let snapshot = &scenario.snapshot;

    let mut results = Vec::new();
    for unit in scenario.acting_units() {
        let paths = generator.legal_paths(unit, snapshot);
        let candidates = paths.len();
        let pass = engine.rank_unit_detailed(unit.id, paths, snapshot, &decisions)?;
        results.push(unit_result(unit.id.to_string(), unit.name.clone(), candidates, pass, args.top));
    }

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&results)?),
        _ => print_text(&scenario, &results),
    }
    Ok(())
}

fn unit_result(unit: String, name: String, candidates: usize, pass: RankingPass, top: usize) -> UnitResult {
    let line = |c: &hex_tactician::ai::RankedCandidate| RankedLine {
        decision: c.decision.clone(),
        score: c.score,
        path: c.path.describe(),
    };
    UnitResult {
        unit,
        name,
        candidates,
        choice: pass.selected.as_ref().map(line),
        runners_up: pass.ranked.iter().skip(1).take(top).map(line).collect(),
        trace: pass.report,
    }
}

fn print_text(scenario: &Scenario, results: &[UnitResult]) {
    println!("\n=== {} (turn {}) ===", scenario.name, scenario.snapshot.turn);
    for result in results {
        println!();
        println!("{} [{}] - {} candidate paths", result.name, result.unit, result.candidates);
        match &result.choice {
            Some(choice) => println!("  -> {} {:.2}: {}", choice.decision, choice.score, choice.path),
            None => println!("  -> no selectable path, holding position"),
        }
        for line in &result.runners_up {
            println!("     {} {:.2}: {}", line.decision, line.score, line.path);
        }
        if let Some(trace) = &result.trace {
            for line in trace.lines().take(12) {
                println!("     | {}", line);
            }
        }
    }
}
