//! R-Tree benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rtree2d::{Entry, Rectangle, RTree};
use std::hint::black_box;

fn grid_rect(i: usize) -> Rectangle {
    let x = (i % 100) as f64;
    let y = (i / 100) as f64;
    Rectangle::new(x, y, x + 1.0, y + 1.0)
}

fn bench_rtree_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("RTree Insert");

    for size in [100usize, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut tree: RTree<u64, Rectangle> = RTree::builder()
                    .min_children(2)
                    .max_children(8)
                    .create()
                    .unwrap();
                for i in 0..size {
                    tree = tree.add(i as u64, grid_rect(i));
                }
                black_box(tree.size())
            });
        });
    }

    group.finish();
}

fn bench_rtree_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("RTree Search");

    let mut tree: RTree<u64, Rectangle> = RTree::builder()
        .min_children(2)
        .max_children(8)
        .create()
        .unwrap();
    for i in 0..10000 {
        tree = tree.add(i as u64, grid_rect(i));
    }

    group.bench_function("search_10k", |b| {
        b.iter(|| {
            let query = Rectangle::new(25.0, 25.0, 75.0, 75.0);
            black_box(tree.search(&query))
        });
    });

    group.finish();
}

fn bench_rtree_bulk_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("RTree Bulk Load");

    let entries: Vec<Entry<u64, Rectangle>> = (0..10000)
        .map(|i| Entry::new(i as u64, grid_rect(i)))
        .collect();

    group.bench_function("bulk_load_10k", |b| {
        b.iter(|| {
            let tree: RTree<u64, Rectangle> = RTree::builder()
                .min_children(2)
                .max_children(8)
                .create_packed(entries.clone())
                .unwrap();
            black_box(tree.size())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rtree_insert,
    bench_rtree_search,
    bench_rtree_bulk_load
);
criterion_main!(benches);
