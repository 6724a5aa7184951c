//! Performance benchmarks for polyline-track-lib
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geo::Point;
use polyline_track_lib::{AnalysisOptions, Precision, analyze, decode, encode};

/// Generate a realistic wandering track with the specified number of points
fn generate_track(num_points: usize, base_lat: f64, base_lon: f64) -> Vec<Point<f64>> {
    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            Point::new(
                base_lon + t * 0.1 + (t * 30.0).cos() * 0.001,
                base_lat + t * 0.1 + (t * 50.0).sin() * 0.001,
            )
        })
        .collect()
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for num_points in [100, 1_000, 10_000] {
        let track = generate_track(num_points, 51.5, -0.1);
        let encoded = encode(&track, Precision::Five);

        group.throughput(Throughput::Elements(num_points as u64));
        group.bench_with_input(
            BenchmarkId::new("encode", num_points),
            &track,
            |b, track| b.iter(|| encode(track, Precision::Five)),
        );
        group.bench_with_input(
            BenchmarkId::new("decode", num_points),
            &encoded,
            |b, encoded| b.iter(|| decode(encoded, Precision::Five)),
        );
    }

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for num_points in [100, 10_000] {
        let primary = generate_track(num_points, 51.5, -0.1);
        let secondary = generate_track(num_points, 51.52, -0.08);

        group.throughput(Throughput::Elements(num_points as u64));
        group.bench_with_input(
            BenchmarkId::new("both_paths", num_points),
            &(primary, secondary),
            |b, (primary, secondary)| {
                b.iter(|| analyze(primary, secondary, AnalysisOptions::default()))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_analyze);
criterion_main!(benches);
