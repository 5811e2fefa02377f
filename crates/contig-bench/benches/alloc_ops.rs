//! Criterion micro-benchmarks for array allocation, release, and access.

use std::hint::black_box;

use contig_arena::{ArenaConfig, MdArena};
use contig_bench::{shape_label, BENCH_ELEMENT, LARGE_SHAPES, SMALL_SHAPES};
use contig_core::ElementType;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn make_arena() -> MdArena {
    MdArena::new(ArenaConfig::default()).unwrap()
}

/// Benchmark: allocate then release one array, per rank.
fn bench_alloc_release_small(c: &mut Criterion) {
    let mut group = c.benchmark_group("alloc_release_small");
    let mut arena = make_arena();
    for shape in SMALL_SHAPES {
        let id = BenchmarkId::from_parameter(shape_label(shape));
        group.bench_with_input(id, shape, |b, shape| {
            b.iter(|| {
                let allocation = arena.allocate(shape, BENCH_ELEMENT).unwrap();
                arena.release(black_box(allocation), shape).unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark: allocate then release ~1M elements, per rank.
fn bench_alloc_release_large(c: &mut Criterion) {
    let mut group = c.benchmark_group("alloc_release_1m");
    group.sample_size(20);
    let mut arena = make_arena();
    for shape in LARGE_SHAPES {
        let id = BenchmarkId::from_parameter(shape_label(shape));
        group.bench_with_input(id, shape, |b, shape| {
            b.iter(|| {
                let allocation = arena.allocate(shape, BENCH_ELEMENT).unwrap();
                arena.release(black_box(allocation), shape).unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark: typed reads through the index versus the flat buffer.
fn bench_element_access(c: &mut Criterion) {
    let mut arena = make_arena();
    let h = arena.alloc_3d(32, 32, 32, ElementType::Float).unwrap();
    let grid = arena.grid(h).unwrap();

    c.bench_function("get_via_index_32k", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for i in 0..32 {
                for j in 0..32 {
                    for k in 0..32 {
                        sum += grid.get::<f32>(&[i, j, k]).unwrap();
                    }
                }
            }
            black_box(sum);
        });
    });

    c.bench_function("get_via_flat_32k", |b| {
        let flat = grid.flat();
        b.iter(|| {
            let mut sum = 0.0f32;
            for n in 0..flat.len() {
                sum += flat.get::<f32>(n).unwrap();
            }
            black_box(sum);
        });
    });
}

criterion_group!(
    benches,
    bench_alloc_release_small,
    bench_alloc_release_large,
    bench_element_access
);
criterion_main!(benches);
