//! # Store Performance Benchmark
//!
//! Every mutation is a constant number of swaps, so the per-operation cost
//! must stay flat as the store grows.
//!
//! Run with: `cargo bench --package vispack_core`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vispack_core::{EntityId, ShapeRecord, Store};

/// Largest store the benchmarks build.
const ENTITY_COUNT: u64 = 100_000;

fn filled(count: u64, visible_every: u64) -> Store<ShapeRecord> {
    let mut store = Store::with_capacity(count as usize);
    for raw in 0..count {
        store
            .insert(
                EntityId::new(raw),
                ShapeRecord::sized(raw as f32, 1.0),
                raw % visible_every != 0,
            )
            .unwrap();
    }
    store
}

/// Benchmark: Insert from an empty store, growth included.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for count in [1_000, 10_000, ENTITY_COUNT] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut store: Store<ShapeRecord> = Store::new();
                for raw in 0..count {
                    black_box(
                        store
                            .insert(EntityId::new(raw), ShapeRecord::default(), raw % 3 != 0)
                            .unwrap(),
                    );
                }
                store.occupied_count()
            });
        });
    }

    group.finish();
}

/// Benchmark: Flip visibility back and forth on a full store.
fn bench_visibility_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility_toggle");

    for count in [1_000, 10_000, ENTITY_COUNT] {
        let mut store = filled(count, 4);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut raw = 0u64;
            b.iter(|| {
                let entity = EntityId::new(raw % count);
                raw = raw.wrapping_add(7919);
                store.set_visible(entity, false).unwrap();
                black_box(store.set_visible(entity, true).unwrap())
            });
        });
    }

    group.finish();
}

/// Benchmark: Remove then re-insert, keeping the store at a steady size.
fn bench_remove_reinsert(c: &mut Criterion) {
    let mut store = filled(ENTITY_COUNT, 2);

    c.bench_function("remove_reinsert_100K", |b| {
        let mut raw = 0u64;
        b.iter(|| {
            let entity = EntityId::new(raw % ENTITY_COUNT);
            raw = raw.wrapping_add(104_729);
            let record = store.remove(entity).unwrap();
            black_box(store.insert(entity, record, raw % 2 == 0).unwrap())
        });
    });
}

/// Benchmark: Read the packed visible prefix the way an upload would.
fn bench_visible_upload(c: &mut Criterion) {
    let store = filled(ENTITY_COUNT, 4);
    let mut staging = vec![0u8; store.visible_bytes().len()];

    c.bench_function("visible_upload_100K", |b| {
        b.iter(|| {
            staging.copy_from_slice(store.visible_bytes());
            black_box(staging.len())
        });
    });
}

criterion_group!(
    benches,
    bench_insert,
    bench_visibility_toggle,
    bench_remove_reinsert,
    bench_visible_upload,
);

criterion_main!(benches);
