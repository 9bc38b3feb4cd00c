//! Benchmarks for the pure planners
//!
//! Bitrate estimation across durations and the cover scale-factor search
//! across image sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use webmforge::encode::{estimate_bitrate, SizeConstraint};
use webmforge::images::{plan_scale, ScaleRange};

fn bench_estimate_bitrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_bitrate");

    let constraint = SizeConstraint::new(6 * 1024 * 1024, 45, 256).unwrap();

    for secs in [120.0, 400.0, 1800.0, 3130.0] {
        group.bench_with_input(BenchmarkId::new("duration", secs as u32), &secs, |b, &secs| {
            b.iter(|| estimate_bitrate(black_box(secs), black_box(&constraint)));
        });
    }

    group.finish();
}

fn bench_plan_scale(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_scale");

    let range = ScaleRange::new(400, 800).unwrap();

    let sizes = [
        ("in_range", 600, 600),
        ("divide/1600x1200", 1600, 1200),
        ("divide/6000x4000", 6000, 4000),
        ("multiply/200x150", 200, 150),
    ];

    for (name, width, height) in sizes {
        group.bench_function(name, |b| {
            b.iter(|| plan_scale(black_box(width), black_box(height), black_box(&range)));
        });
    }

    // Worst case: a tiny target range forces a long divisor search.
    let narrow = ScaleRange::new(10, 12).unwrap();
    group.bench_function("divide/narrow_range", |b| {
        b.iter(|| plan_scale(black_box(20000), black_box(15000), black_box(&narrow)));
    });

    group.finish();
}

criterion_group!(benches, bench_estimate_bitrate, bench_plan_scale);
criterion_main!(benches);
