use criterion::{Criterion, criterion_group, criterion_main};
use review_anchor_engine::aggregate;
mod common;

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("markers");

    let sparse = common::generate_annotations(50, 1);
    group.bench_function("aggregate_single_line", |b| {
        b.iter(|| std::hint::black_box(aggregate(std::hint::black_box(&sparse))));
    });

    let overlapping = common::generate_annotations(200, 20);
    group.bench_function("aggregate_overlapping_ranges", |b| {
        b.iter(|| std::hint::black_box(aggregate(std::hint::black_box(&overlapping))));
    });

    group.finish();
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
