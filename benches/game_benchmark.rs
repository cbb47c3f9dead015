//! Benchmarks for map generation, AI planning and complete matches.
//!
//! `run_match` is the hot path of a tournament.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tunti::ai::{Difficulty, HeuristicPolicy, Policy};
use tunti::config::GameConfig;
use tunti::game::{FactionId, GameState};
use tunti::rng::{Mulberry32, Seed};
use tunti::snapshot;
use tunti::tournament::{run_match, MatchConfig};

fn bench_generate(c: &mut Criterion) {
    let config = GameConfig::default();
    c.bench_function("generate_18x12", |b| {
        b.iter(|| GameState::generate(black_box(&Seed::default()), black_box(&config)));
    });

    let large = GameConfig {
        width: 64,
        height: 48,
        ..GameConfig::default()
    };
    c.bench_function("generate_64x48", |b| {
        b.iter(|| GameState::generate(black_box(&Seed::default()), black_box(&large)));
    });
}

fn bench_ai_decide(c: &mut Criterion) {
    let state = GameState::generate(&Seed::default(), &GameConfig::default()).unwrap();
    c.bench_function("ai_decide_opening", |b| {
        let mut policy = HeuristicPolicy::new(Difficulty::Hard, Mulberry32::new(7));
        b.iter(|| black_box(policy.decide(black_box(&state), FactionId::FIRST)));
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let state = GameState::generate(&Seed::default(), &GameConfig::default()).unwrap();
    let text = snapshot::encode(&state, 1).unwrap();

    c.bench_function("snapshot_encode", |b| {
        b.iter(|| snapshot::encode(black_box(&state), 1));
    });
    c.bench_function("snapshot_decode", |b| {
        b.iter(|| snapshot::decode(black_box(&text)));
    });
}

fn bench_match(c: &mut Criterion) {
    let config = MatchConfig::default();
    c.bench_function("match_default", |b| {
        b.iter(|| run_match(black_box(&Seed::from(42)), black_box(&config)));
    });

    // Ten matches sequentially, without rayon overhead.
    let short = MatchConfig {
        max_turns: 60,
        ..MatchConfig::default()
    };
    c.bench_function("10_matches_sequential", |b| {
        b.iter(|| {
            for seed in 0..10u32 {
                let _ = black_box(run_match(&Seed::from(seed), &short));
            }
        });
    });
}

criterion_group!(benches, bench_generate, bench_ai_decide, bench_snapshot, bench_match);
criterion_main!(benches);
