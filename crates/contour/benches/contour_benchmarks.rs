//! Benchmarks for region extraction and assembly.
//!
//! Run with: cargo bench --package contour --bench contour_benchmarks

use contour::stats::FieldStats;
use contour::{extract, Grid, GridCoords};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geom_common::{CrsCode, Level};
use rand::Rng;

/// Generate a smooth temperature-like field with hills and valleys.
fn smooth_grid(nx: usize, ny: usize) -> Grid {
    let mut values = vec![0.0; nx * ny];
    for j in 0..ny {
        for i in 0..nx {
            let fx = i as f64 / nx as f64;
            let fy = j as f64 / ny as f64;

            let v1 = (fx * std::f64::consts::PI * 4.0).sin() * 20.0;
            let v2 = (fy * std::f64::consts::PI * 4.0).sin() * 20.0;
            let v3 = ((fx + fy) * std::f64::consts::PI * 2.0).sin() * 10.0;

            values[j * nx + i] = 50.0 + v1 + v2 + v3;
        }
    }
    build_grid(values, nx, ny)
}

/// Same field plus random noise (more fragments per level).
fn noisy_grid(nx: usize, ny: usize) -> Grid {
    let mut rng = rand::thread_rng();
    let base = smooth_grid(nx, ny);
    let values = base
        .values()
        .iter()
        .map(|&v| v + rng.gen_range(-5.0..5.0))
        .collect();
    build_grid(values, nx, ny)
}

fn build_grid(values: Vec<f64>, nx: usize, ny: usize) -> Grid {
    let xs: Vec<f64> = (0..nx).map(|i| i as f64 * 0.1).collect();
    let ys: Vec<f64> = (0..ny).map(|j| j as f64 * 0.1).collect();
    Grid::new(values, nx, ny, GridCoords::Rectilinear { xs, ys }, None).unwrap()
}

fn band_levels(n: usize) -> Vec<Level> {
    let step = 100.0 / n as f64;
    (0..n)
        .map(|k| Level::band(k as f64 * step, (k + 1) as f64 * step).unwrap())
        .collect()
}

// =============================================================================
// SINGLE LEVEL EXTRACTION BENCHMARKS
// =============================================================================

fn bench_single_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_threshold");

    let sizes = [(64, 64), (128, 128), (256, 256), (512, 512)];

    for (nx, ny) in sizes {
        let smooth = smooth_grid(nx, ny);
        let noisy = noisy_grid(nx, ny);
        let levels = [Level::Threshold(50.0)];

        group.throughput(Throughput::Elements((nx * ny) as u64));

        group.bench_with_input(
            BenchmarkId::new("smooth", format!("{}x{}", nx, ny)),
            &smooth,
            |b, grid| {
                b.iter(|| {
                    extract(
                        black_box(grid),
                        black_box(&levels),
                        CrsCode::Epsg4326,
                        CrsCode::Epsg4326,
                    )
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("noisy", format!("{}x{}", nx, ny)),
            &noisy,
            |b, grid| {
                b.iter(|| {
                    extract(
                        black_box(grid),
                        black_box(&levels),
                        CrsCode::Epsg4326,
                        CrsCode::Epsg4326,
                    )
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// MULTI LEVEL BAND BENCHMARKS
// =============================================================================

fn bench_band_sets(c: &mut Criterion) {
    let mut group = c.benchmark_group("band_sets");
    group.sample_size(20);

    let grid = smooth_grid(256, 256);

    for n_bands in [4, 10, 20] {
        let levels = band_levels(n_bands);
        group.bench_with_input(
            BenchmarkId::new("bands", n_bands),
            &levels,
            |b, levels| {
                b.iter(|| {
                    extract(
                        black_box(&grid),
                        black_box(levels),
                        CrsCode::Epsg4326,
                        CrsCode::Epsg4326,
                    )
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// REPROJECTION BENCHMARKS
// =============================================================================

fn bench_reprojected_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("reprojected_extraction");
    group.sample_size(20);

    let grid = smooth_grid(256, 256);
    let levels = band_levels(10);

    for (name, target) in [("geographic", CrsCode::Epsg4326), ("mercator", CrsCode::Epsg3857)] {
        group.bench_with_input(BenchmarkId::new("target", name), &target, |b, &target| {
            b.iter(|| {
                extract(
                    black_box(&grid),
                    black_box(&levels),
                    CrsCode::Epsg4326,
                    target,
                )
            });
        });
    }

    group.finish();
}

// =============================================================================
// FIELD STATISTICS BENCHMARKS
// =============================================================================

fn bench_field_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_stats");

    for (nx, ny) in [(128, 128), (512, 512)] {
        let grid = smooth_grid(nx, ny);
        group.throughput(Throughput::Elements((nx * ny) as u64));
        group.bench_with_input(
            BenchmarkId::new("compute", format!("{}x{}", nx, ny)),
            &grid,
            |b, grid| {
                b.iter(|| FieldStats::compute(black_box(grid)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_threshold,
    bench_band_sets,
    bench_reprojected_extraction,
    bench_field_stats,
);
criterion_main!(benches);
