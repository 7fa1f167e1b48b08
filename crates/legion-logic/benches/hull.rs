use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use legion_logic::geometry::Vec2;
use legion_logic::hull::HullGeometry;

/// Deterministic scatter without pulling an RNG into the bench.
fn scatter(n: usize) -> Vec<Vec2> {
    (0..n)
        .map(|i| {
            let t = i as f32 * 2.399_963; // golden angle
            let r = (i as f32).sqrt() * 4.0;
            Vec2::new(t.cos() * r, t.sin() * r)
        })
        .collect()
}

fn bench_hull(c: &mut Criterion) {
    let mut group = c.benchmark_group("hull_geometry");
    for n in [10usize, 100, 1000] {
        let points = scatter(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, pts| {
            b.iter(|| HullGeometry::compute(black_box(pts), 20.0, Vec2::ZERO))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hull);
criterion_main!(benches);
