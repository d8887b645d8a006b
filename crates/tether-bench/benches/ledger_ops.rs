//! Criterion micro-benchmarks for ledger registration, rebinding and teardown.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tether_bench::{populated_ledger, PAYLOAD_WORDS};

/// Benchmark: register 1K payloads from a one-slot ledger, then tear down.
fn bench_register_teardown_1k(c: &mut Criterion) {
    c.bench_function("register_teardown_1k", |b| {
        b.iter(|| {
            let (ledger, tokens) = populated_ledger(1_000);
            black_box(tokens.len());
            black_box(ledger.destroy_all());
        });
    });
}

/// Benchmark: replace the middle slot of a 1K ledger (destroys the old payload).
fn bench_replace_middle(c: &mut Criterion) {
    let (mut ledger, tokens) = populated_ledger(1_000);
    let middle = tokens[500];
    c.bench_function("replace_middle_1k", |b| {
        b.iter(|| {
            ledger
                .replace(middle, Box::new([7; PAYLOAD_WORDS]))
                .expect("middle slot stays tracked");
        });
    });
}

/// Benchmark: reset the middle slot and hand the old payload back.
fn bench_reset_middle(c: &mut Criterion) {
    let (mut ledger, tokens) = populated_ledger(1_000);
    let middle = tokens[500];
    c.bench_function("reset_middle_1k", |b| {
        b.iter(|| {
            let old = ledger
                .reset(middle, Box::new([9; PAYLOAD_WORDS]))
                .expect("middle slot stays tracked");
            black_box(old);
        });
    });
}

/// Benchmark: release every other payload of a 1K ledger, then tear down.
fn bench_release_half(c: &mut Criterion) {
    c.bench_function("release_half_1k", |b| {
        b.iter(|| {
            let (mut ledger, tokens) = populated_ledger(1_000);
            for token in tokens.iter().step_by(2) {
                black_box(ledger.release(*token));
            }
            black_box(ledger.destroy_all());
        });
    });
}

criterion_group!(
    benches,
    bench_register_teardown_1k,
    bench_replace_middle,
    bench_reset_middle,
    bench_release_half
);
criterion_main!(benches);
