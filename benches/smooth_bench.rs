#![deny(warnings)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use smooth_bezier::*;

/// Anchors on a wobbly spiral, closed if requested
fn anchors(count: usize, closed: bool) -> Vec<Point2> {
    let mut points: Vec<_> = (0..count)
        .map(|i| {
            let a = i as Scalar * 0.7;
            let r = 10.0 + i as Scalar + 3.0 * (3.0 * a).sin();
            Point::new(r * a.cos(), r * a.sin())
        })
        .collect();
    if closed && count > 1 {
        points.push(points[0]);
    }
    points
}

fn smooth_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("smooth handles");
    for count in [4, 64, 1024] {
        group.throughput(Throughput::Elements(count as u64));
        let open = anchors(count, false);
        group.bench_with_input(BenchmarkId::new("open", count), &open, |b, points| {
            b.iter(|| get_smooth_handle_points(black_box(points)))
        });
        // dense solve is cubic in the number of anchors, keep it small
        if count <= 64 {
            let closed = anchors(count, true);
            group.bench_with_input(BenchmarkId::new("closed", count), &closed, |b, points| {
                b.iter(|| get_smooth_handle_points(black_box(points)))
            });
        }
    }
    group.finish();
}

fn bezier_benchmark(c: &mut Criterion) {
    let cubic: Cubic<2> = Cubic::new((158.0, 70.0), (210.0, 250.0), (25.0, 190.0), (219.0, 89.0));
    let points = cubic.points();
    let mut group = c.benchmark_group("cubic");
    group
        .throughput(Throughput::Elements(1))
        .bench_function("at", |b| b.iter(|| black_box(cubic).at(black_box(0.3))))
        .bench_function("bernstein", |b| {
            b.iter(|| bezier_at(black_box(&points), black_box(0.3)))
        })
        .bench_function("de casteljau", |b| {
            b.iter(|| de_casteljau(black_box(&points), black_box(0.3)))
        })
        .bench_function("cut", |b| b.iter(|| black_box(cubic).cut(0.2, 0.7)))
        .bench_function("partial points", |b| {
            b.iter(|| partial_bezier_points(black_box(&points), 0.2, 0.7))
        });
    group.finish();
}

criterion_group!(benches, smooth_benchmark, bezier_benchmark);
criterion_main!(benches);
