use coverage::{
    geo::coord, AreaParams, CameraModel, Density, GeodeticPoint, LocalFrame, Planner, PoiParams,
    SpiralParams, StripParams,
};

use criterion::{criterion_group, criterion_main, Criterion};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// A 1.2 km x 0.8 km field with one notched corner, near Zurich.
fn field() -> Vec<GeodeticPoint> {
    let frame = LocalFrame::new(47.397, 8.545);
    [
        (0.0, 0.0),
        (1200.0, 0.0),
        (1200.0, 500.0),
        (900.0, 800.0),
        (0.0, 800.0),
    ]
    .iter()
    .map(|&(x, y)| {
        let (lat, lon) = frame.to_geodetic(coord! { x: x, y: y });
        GeodeticPoint::new(lat, lon)
    })
    .collect()
}

fn plan_missions(c: &mut Criterion) {
    let mut group = c.benchmark_group("Plan");

    let camera = CameraModel::default();
    let polygon = field();

    let area = AreaParams::new(polygon.clone()).heading(17.0).gsd(0.02);
    group.bench_with_input("area", &(area, camera), |b, (p, c)| b.iter(|| p.plan(c)));

    let sampled = AreaParams::new(polygon.clone())
        .heading(17.0)
        .gsd(0.02)
        .density(Density::Sampled);
    group.bench_with_input("area sampled", &(sampled, camera), |b, (p, c)| {
        b.iter(|| p.plan(c))
    });

    let strip = StripParams::new(polygon.clone()).altitude(80.0);
    group.bench_with_input("strip", &(strip, camera), |b, (p, c)| b.iter(|| p.plan(c)));

    let poi = PoiParams::new(polygon[0].with_altitude(400.0), 500.0).altitude(60.0);
    group.bench_with_input("poi", &(poi, camera), |b, (p, c)| b.iter(|| p.plan(c)));

    let spiral = SpiralParams::new(polygon).altitude(60.0);
    group.bench_with_input("spiral", &(spiral, camera), |b, (p, c)| b.iter(|| p.plan(c)));
}

criterion_group!(benches, plan_missions);
criterion_main!(benches);
