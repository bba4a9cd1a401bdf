//! Overall performance bench for a static number of keys in a few
//! scenarios. Here to quickly test for regressions.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use artree::{AdaptiveRadixTree, KeyBytes};

// Tree sizes for the benchmarks that measure retrievals.
const TREE_SIZES: [u64; 3] = [1 << 15, 1 << 18, 1 << 20];

pub fn seq_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_insert");
    group.throughput(Throughput::Elements(1));
    group.bench_function("u64_keys", |b| {
        let mut tree = AdaptiveRadixTree::new();
        let mut next = 0u64;
        b.iter(|| {
            tree.insert(next.key_bytes(), next).unwrap();
            next += 1;
        });
    });
    group.finish();
}

pub fn rand_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("rand_insert");
    group.throughput(Throughput::Elements(1));
    group.bench_function("u64_keys", |b| {
        let mut tree = AdaptiveRadixTree::new();
        let mut rng = rand::rng();
        b.iter(|| {
            let key: u64 = rng.random_range(0..(1 << 22));
            black_box(tree.insert(key.key_bytes(), key)).ok();
        });
    });
    group.finish();
}

pub fn rand_get(c: &mut Criterion) {
    for size in TREE_SIZES {
        c.bench_with_input(BenchmarkId::new("rand_get", size), &size, |b, size| {
            let mut tree = AdaptiveRadixTree::new();
            for i in 0..*size {
                tree.insert(i.key_bytes(), i).unwrap();
            }
            let mut rng = rand::rng();
            b.iter(|| {
                let key: u64 = rng.random_range(0..*size);
                black_box(tree.get(key.key_bytes()));
            });
        });
    }
}

pub fn string_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_get");
    group.throughput(Throughput::Elements(1));

    let keys: Vec<Vec<u8>> = (0..100_000u32)
        .map(|i| format!("user/{i:08}/profile").key_bytes())
        .collect();
    let mut tree = AdaptiveRadixTree::new();
    for (i, key) in keys.iter().enumerate() {
        tree.insert(key, i).unwrap();
    }

    group.bench_function("shared_prefix_keys", |b| {
        let mut rng = rand::rng();
        b.iter(|| {
            let key = &keys[rng.random_range(0..keys.len())];
            black_box(tree.get(key));
        });
    });
    group.finish();
}

criterion_group!(benches, seq_insert, rand_insert, rand_get, string_get);
criterion_main!(benches);
