use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use generals::ai::{choose_spawn_placements, AIConfig, MoveSearch, SpawnConfig};
use generals::board::Board;
use generals::core::{GameRng, Side};
use generals::inference::BeliefTracker;
use generals::session::GameSession;
use std::hint::black_box;

/// A board a few moves into an engine match, with side B to move.
fn midgame() -> Board {
    let mut session = GameSession::engine_match(AIConfig::default().with_max_depth(0), 4242);
    session.run_spawn().unwrap();
    while session.moves_played() < 7 && session.board().check_outcome().is_none() {
        session.step().unwrap();
    }
    session.board().clone()
}

fn bench_choose_move(c: &mut Criterion) {
    let board = midgame();
    let beliefs = BeliefTracker::from_board(&board, Side::A);

    let mut group = c.benchmark_group("search/choose_move");
    for depth in [1, 2] {
        let config = AIConfig::default().with_max_depth(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &config, |bch, config| {
            bch.iter(|| {
                let mut search = MoveSearch::new(config, &beliefs);
                black_box(search.choose_move(&board))
            })
        });
    }
    group.finish();
}

fn bench_spawn(c: &mut Criterion) {
    let config = SpawnConfig::default();
    let mut rng = GameRng::new(7);

    c.bench_function("spawn/heuristic_layout", |bch| {
        bch.iter(|| {
            let board = Board::new();
            black_box(choose_spawn_placements(Side::A, &board, &config, &mut rng))
        })
    });
}

criterion_group!(benches, bench_choose_move, bench_spawn);
criterion_main!(benches);
