//! Criterion benchmarks for the draw optimizer.
//!
//! Uses a synthetic roster on the reference 11-group layout.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use u_draw::config::DrawConfig;
use u_draw::draw::FeasibleGenerator;
use u_draw::history::HistoryStore;
use u_draw::model::{DrawModel, Player, Seed};
use u_draw::penalty::PenaltyEvaluator;
use u_draw::sa::{AnnealConfig, AnnealRunner};
use u_draw::scenario::DrawProblem;

// ===========================================================================
// Synthetic roster: 34 players over 17 clubs, full seed set
// ===========================================================================

fn roster() -> Vec<Player> {
    (1..=34)
        .map(|i| {
            let seed = match i {
                1 => Seed::RankOne,
                2 => Seed::RankTwo,
                3 | 4 => Seed::PoolThreeFour,
                5..=8 => Seed::PoolFiveEight,
                _ => Seed::None,
            };
            Player::new(format!("P{i:02}"), format!("Club{}", i % 17)).with_seed(seed)
        })
        .collect()
}

fn model() -> DrawModel {
    DrawModel::new(roster(), &DrawConfig::default()).unwrap()
}

fn warm_history(model: &DrawModel, runs: usize) -> HistoryStore {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let generator = FeasibleGenerator::new(model);
    let mut history = HistoryStore::unbounded(model.n_players(), model.n_groups());
    for _ in 0..runs {
        history.fold(&generator.generate(&mut rng).unwrap());
    }
    history
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_generate(c: &mut Criterion) {
    let model = model();
    let generator = FeasibleGenerator::new(&model);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("generate_reference", |b| {
        b.iter(|| black_box(generator.generate(&mut rng).unwrap()))
    });
}

fn bench_score(c: &mut Criterion) {
    let model = model();
    let config = DrawConfig::default();
    let mut group = c.benchmark_group("score");

    for &runs in &[0usize, 10, 100] {
        let history = warm_history(&model, runs);
        let evaluator = PenaltyEvaluator::new(&model, &history, config.weights);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let assignment = FeasibleGenerator::new(&model).generate(&mut rng).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(runs), &assignment, |b, a| {
            b.iter(|| black_box(evaluator.breakdown(black_box(a))))
        });
    }
    group.finish();
}

fn bench_anneal(c: &mut Criterion) {
    let model = model();
    let config = DrawConfig::default();
    let history = warm_history(&model, 10);
    let problem = DrawProblem::new(&model, &history, &config);
    let mut group = c.benchmark_group("anneal");
    group.sample_size(10);

    for &iterations in &[200usize, 1000, 5000] {
        let anneal = AnnealConfig::default().with_max_iterations(iterations);
        group.bench_with_input(BenchmarkId::from_parameter(iterations), &anneal, |b, a| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            b.iter(|| black_box(AnnealRunner::run(&problem, a, &mut rng).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_score, bench_anneal);
criterion_main!(benches);
