//! End-to-end runs over a directory of real PNG/JPEG files.
//!
//! Fixtures are 20x20 photos generated into a temporary directory; with the
//! default crop the analysis window is the centre 12x12 block.

use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use canopy_algorithms::config::AnalysisConfig;
use canopy_algorithms::timeseries::{ForecastParams, GrowthParams, analyze_growth, assemble, forecast};
use canopy_core::io::{
    OverlayDir, read_forecast, read_report, read_rgb, scan_image_dir, write_forecast, write_report,
};
use canopy_core::{Error, OrderingStrategy, order_samples};
use image::{Rgb, RgbImage};

const SOIL: Rgb<u8> = Rgb([60, 40, 30]);
const LEAF: Rgb<u8> = Rgb([30, 180, 30]);

/// Photo with `leaves` green pixels inside the analysis window.
fn write_photo(path: &Path, leaves: u32) {
    let mut img = RgbImage::from_pixel(20, 20, SOIL);
    for i in 0..leaves {
        img.put_pixel(4 + i % 12, 4 + i / 12, LEAF);
    }
    img.save(path).unwrap();
}

#[test]
fn test_directory_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    fs::create_dir(&images).unwrap();

    // Written out of order on purpose
    for (day, leaves) in [(5, 62), (1, 10), (3, 14), (2, 12), (4, 60)] {
        write_photo(&images.join(format!("2024-06-0{day}.png")), leaves);
    }
    fs::write(images.join("2024-06-06.jpg"), b"not really a jpeg").unwrap();
    fs::write(images.join("readme.txt"), b"station notes").unwrap();

    let files = scan_image_dir(&images).unwrap();
    assert_eq!(files.len(), 6);
    let ordered = order_samples(files, OrderingStrategy::FilenameDate).unwrap();

    let config = AnalysisConfig::default();
    let overlay_dir = dir.path().join("overlay");
    let assembly = assemble(&ordered, &config, &OverlayDir::new(&overlay_dir)).unwrap();

    assert_eq!(assembly.records.len(), 5);
    assert_eq!(assembly.skipped.len(), 1);
    assert_eq!(assembly.skipped[0].id, "2024-06-06.jpg");
    assert_eq!(assembly.areas(), vec![10, 12, 14, 60, 62]);

    let first = &assembly.records[0];
    assert_eq!(first.image_id, "2024-06-01.png");
    assert_eq!(first.height, 12);
    assert_relative_eq!(first.density, 10.0 / 144.0);
    assert_relative_eq!(first.health, 10.0 / 11.0);

    let analysis = analyze_growth(&assembly.areas(), GrowthParams::from(&config)).unwrap();
    assert_eq!(analysis.growth, vec![0, 2, 2, 46, 2]);
    assert_eq!(analysis.anomalies, vec![3]);

    let report = dir.path().join("plant_analysis.csv");
    write_report(&report, &assembly.records, &analysis.growth, &analysis.anomalies).unwrap();
    let rows = read_report(&report).unwrap();
    let flagged: Vec<&str> = rows
        .iter()
        .filter(|r| r.is_anomaly())
        .map(|r| r.image.as_str())
        .collect();
    assert_eq!(flagged, vec!["2024-06-04.png"]);

    let fc = forecast(&assembly.areas(), ForecastParams::from(&config)).unwrap();
    let fc_path = dir.path().join("forecast.csv");
    write_forecast(&fc_path, &fc.values, &assembly.areas()).unwrap();
    let fc_rows = read_forecast(&fc_path).unwrap();
    assert_eq!(fc_rows.len(), 35);
    assert_eq!(fc_rows[4].observed, Some(62));
    assert_eq!(fc_rows[5].observed, None);

    // One overlay per measured photo, tinted only inside the window
    for r in &assembly.records {
        assert!(overlay_dir.join(&r.image_id).exists());
    }
    assert!(!overlay_dir.join("2024-06-06.jpg").exists());
    let overlay = read_rgb(&overlay_dir.join("2024-06-01.png")).unwrap();
    assert_eq!(overlay.pixel(0, 0).unwrap(), [60, 40, 30]);
    assert_eq!(overlay.pixel(4, 4).unwrap(), [15, 218, 15]);
}

#[test]
fn test_solid_jpeg_is_measured() {
    let dir = tempfile::tempdir().unwrap();
    RgbImage::from_pixel(20, 20, LEAF)
        .save(dir.path().join("20250314_081500.jpg"))
        .unwrap();

    let ordered = order_samples(scan_image_dir(dir.path()).unwrap(), Default::default()).unwrap();
    let assembly = assemble(
        &ordered,
        &AnalysisConfig::default(),
        &canopy_core::DiscardOverlays,
    )
    .unwrap();
    assert_eq!(assembly.records[0].area, 144);
    assert_relative_eq!(assembly.records[0].density, 1.0);
}

#[test]
fn test_unparseable_name_aborts_before_processing() {
    let dir = tempfile::tempdir().unwrap();
    write_photo(&dir.path().join("2024-06-01.png"), 5);
    write_photo(&dir.path().join("holiday.png"), 5);

    let result = order_samples(scan_image_dir(dir.path()).unwrap(), OrderingStrategy::FilenameDate);
    assert!(matches!(result, Err(Error::Ordering { .. })));

    // Lexical order is available when asked for
    let lexical = order_samples(scan_image_dir(dir.path()).unwrap(), OrderingStrategy::Lexical).unwrap();
    assert_eq!(lexical.len(), 2);
}

#[test]
fn test_forecast_skipped_for_single_photo() {
    let dir = tempfile::tempdir().unwrap();
    write_photo(&dir.path().join("2024-06-01.png"), 5);

    let ordered = order_samples(scan_image_dir(dir.path()).unwrap(), Default::default()).unwrap();
    let assembly = assemble(
        &ordered,
        &AnalysisConfig::default(),
        &canopy_core::DiscardOverlays,
    )
    .unwrap();

    let analysis = analyze_growth(&assembly.areas(), GrowthParams::default()).unwrap();
    assert!(analysis.anomalies.is_empty());
    assert!(matches!(
        forecast(&assembly.areas(), ForecastParams::default()),
        Err(Error::InsufficientData { .. })
    ));
}
