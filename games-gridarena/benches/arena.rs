use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use games_gridarena::{Arena, SurvivalHeuristic, STAY};
use grid_mcts::{EmctsConfig, EmctsSearch, ForwardModel, MctsConfig, MctsSearch};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn arena() -> Arena {
    Arena::new(11, 11, 200)
        .with_agent(1, 1)
        .with_agent(9, 1)
        .with_agent(1, 9)
        .with_agent(9, 9)
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_advance");
    group.bench_function("joint_step", |b| {
        let base = arena();
        b.iter_batched(
            || base.clone(),
            |mut state| {
                state.advance(&[STAY, STAY, STAY, STAY]);
                state
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_classical_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("classical_search");
    group.bench_function("run_100_iterations", |b| {
        let state = arena();
        let config = MctsConfig::default();
        b.iter_batched(
            || ChaCha20Rng::seed_from_u64(42),
            |mut rng| {
                MctsSearch::new(&state, &SurvivalHeuristic, config.clone())
                    .run(&mut rng)
                    .unwrap()
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_evolutionary_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolutionary_search");
    group.bench_function("run_depth_4", |b| {
        let state = arena();
        let config = EmctsConfig::default().with_rollout_depth(4).with_iterations(50);
        b.iter_batched(
            || ChaCha20Rng::seed_from_u64(42),
            |mut rng| {
                let mut search = EmctsSearch::new(&state, &SurvivalHeuristic, config.clone(), &mut rng);
                search.run(&mut rng)
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_advance,
    bench_classical_search,
    bench_evolutionary_search
);
criterion_main!(benches);
