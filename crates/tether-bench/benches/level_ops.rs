//! Criterion benchmarks for level load and hot reload.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tether_level::{Level, LevelConfig};
use tether_test_utils::ScriptedSource;

/// Benchmark: load a level with 64 platforms and 32 boxes, then destroy it.
fn bench_level_load(c: &mut Criterion) {
    c.bench_function("level_load", |b| {
        b.iter(|| {
            let source = ScriptedSource::new().with_platforms(64).with_boxes(32);
            let level = Level::load(source, LevelConfig::default()).unwrap();
            black_box(level.destroy());
        });
    });
}

/// Benchmark: hot-reload every section except the player.
fn bench_level_reload(c: &mut Criterion) {
    let mut level = Level::load(ScriptedSource::new(), LevelConfig::default()).unwrap();
    let mut generation = 1u32;
    c.bench_function("level_reload", |b| {
        b.iter(|| {
            let source = ScriptedSource::new()
                .with_generation(generation)
                .with_platforms(64)
                .with_boxes(32);
            level.reload_preserve_player(source).unwrap();
            generation += 1;
        });
    });
    black_box(level.destroy());
}

criterion_group!(benches, bench_level_load, bench_level_reload);
criterion_main!(benches);
