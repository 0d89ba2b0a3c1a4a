//! # Geodesy Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tracker_lib::{
    geodesy::{compute_bearing, compute_look_angles, GeoPosition},
    tracking::{compute_targets, TrackingConfig},
};

fn geodesy_benchmark(c: &mut Criterion) {
    let observer = GeoPosition::new(51.4700, -0.4543, 25.0);
    let target = GeoPosition::new(51.4900, -0.3000, 900.0);

    c.bench_function("compute_bearing", |b| {
        b.iter(|| compute_bearing(
            black_box(observer.lat_deg),
            black_box(observer.lon_deg),
            black_box(target.lat_deg),
            black_box(target.lon_deg)
        ))
    });

    c.bench_function("compute_look_angles", |b| {
        b.iter(|| compute_look_angles(black_box(&observer), black_box(&target)))
    });

    let config = TrackingConfig {
        my_lat: observer.lat_deg,
        my_lon: observer.lon_deg,
        my_alt: observer.alt_m,
        tgt_lat: target.lat_deg,
        tgt_lon: target.lon_deg,
        tgt_alt: target.alt_m,
        default_mode: false,
    };

    c.bench_function("compute_targets", |b| {
        b.iter(|| compute_targets(black_box(&config)))
    });
}

criterion_group!(benches, geodesy_benchmark);
criterion_main!(benches);
