//! Benchmarks for store backends.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use flatprefs_storage::{MemoryStore, PreferenceStore, RedbStore, WriteBatch};

fn batch_of(size: u64) -> WriteBatch {
    let mut batch = WriteBatch::new();
    for i in 0..size {
        batch.put(format!("list.{i}"), format!("value:{i:05}"));
    }
    batch
}

/// Benchmark applying batches of increasing size.
fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_batch");

    for size in [10u64, 100, 1000] {
        group.throughput(Throughput::Elements(size));
        group.bench_function(format!("memory_{size}"), |b| {
            b.iter_batched(
                || (MemoryStore::new(), batch_of(size)),
                |(store, batch)| store.apply(batch).unwrap(),
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("redb_{size}"), |b| {
            b.iter_batched(
                || (RedbStore::in_memory().unwrap(), batch_of(size)),
                |(store, batch)| store.apply(batch).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark the full key scan the decoder relies on.
fn bench_keys(c: &mut Criterion) {
    let store = RedbStore::in_memory().unwrap();
    store.apply(batch_of(1000)).unwrap();

    c.bench_function("redb_keys_1000", |b| b.iter(|| black_box(store.keys().unwrap())));
}

criterion_group!(benches, bench_apply, bench_keys);
criterion_main!(benches);
