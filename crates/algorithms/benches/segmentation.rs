//! Benchmarks for the per-photo hot path

use canopy_algorithms::metrics::extract_metrics;
use canopy_algorithms::segmentation::{SegmentationParams, segment, to_hsv};
use canopy_algorithms::timeseries::{ForecastParams, GrowthParams, analyze_growth, forecast};
use canopy_core::RgbBands;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Synthetic plant photo: soil background with a leafy blob and a yellow rim.
fn create_photo(size: usize) -> RgbBands {
    let mut img = RgbBands::filled(size, size, [70, 50, 35]);
    let center = size as f64 / 2.0;
    for row in 0..size {
        for col in 0..size {
            let dx = col as f64 - center;
            let dy = row as f64 - center;
            let dist = (dx * dx + dy * dy).sqrt() / center;
            let shade = ((row * 7 + col * 13) % 31) as u8;
            let px = if dist < 0.5 {
                [30 + shade, 150 + shade, 40]
            } else if dist < 0.6 {
                [200 + shade, 190, 30]
            } else {
                continue;
            };
            img.set_pixel(row, col, px).unwrap();
        }
    }
    img
}

fn bench_hsv(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation/to_hsv");
    for size in [256, 512, 1024] {
        let img = create_photo(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| to_hsv(black_box(&img)).unwrap())
        });
    }
    group.finish();
}

fn bench_segment_and_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation/segment_and_measure");
    let params = SegmentationParams::default();
    for size in [256, 512, 1024, 2048] {
        let img = create_photo(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let masks = segment(black_box(&img), &params).unwrap();
                extract_metrics(&masks).unwrap()
            })
        });
    }
    group.finish();
}

fn bench_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("timeseries/analyze_and_forecast");
    for n in [100, 1000, 5000] {
        let areas: Vec<u64> = (0..n).map(|i| 1000 + 5 * i + (i * 37) % 11).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let growth = analyze_growth(black_box(&areas), GrowthParams::default()).unwrap();
                let fc = forecast(black_box(&areas), ForecastParams::default()).unwrap();
                (growth, fc)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hsv, bench_segment_and_measure, bench_series);
criterion_main!(benches);
