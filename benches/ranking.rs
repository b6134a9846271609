use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hex_tactician::ai::{stock_decisions, BehaviorSettings, TacticalEngine};
use hex_tactician::battle::{PathGenerator, ReachablePathGenerator};
use hex_tactician::core::EngineConfig;
use hex_tactician::scenario::ScenarioGenerator;

fn bench_rank_unit(c: &mut Criterion) {
    let scenario = ScenarioGenerator {
        width: 30,
        height: 20,
        units_per_side: 6,
        ..ScenarioGenerator::default()
    }
    .generate(1234);
    let behavior = BehaviorSettings::default();
    let decisions = stock_decisions(&behavior.decisions);
    let Some(unit) = scenario.acting_units().next() else {
        return;
    };
    let paths = ReachablePathGenerator.legal_paths(unit, &scenario.snapshot);

    let sequential = EngineConfig {
        parallel_threshold: usize::MAX,
        ..EngineConfig::default()
    };
    let engine = TacticalEngine::new(sequential, behavior.clone()).expect("engine");
    c.bench_function("rank_unit/sequential", |b| {
        b.iter(|| {
            let choice = engine
                .rank_unit(unit.id, paths.clone(), &scenario.snapshot, &decisions)
                .expect("pass");
            black_box(choice.map(|c| c.score));
        })
    });

    let engine = TacticalEngine::new(EngineConfig::default(), behavior).expect("engine");
    c.bench_function("rank_unit/parallel", |b| {
        b.iter(|| {
            let choice = engine
                .rank_unit(unit.id, paths.clone(), &scenario.snapshot, &decisions)
                .expect("pass");
            black_box(choice.map(|c| c.score));
        })
    });
}

fn bench_path_generation(c: &mut Criterion) {
    let scenario = ScenarioGenerator::new().generate(99);
    let Some(unit) = scenario.acting_units().next() else {
        return;
    };
    c.bench_function("legal_paths", |b| {
        b.iter(|| black_box(ReachablePathGenerator.legal_paths(unit, &scenario.snapshot).len()))
    });
}

criterion_group!(benches, bench_rank_unit, bench_path_generation);
criterion_main!(benches);
