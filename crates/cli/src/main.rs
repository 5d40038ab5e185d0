//! Canopy CLI - plant growth analysis for the photo station

mod config;

use anyhow::{Context, Result};
use chrono::{Local, Timelike};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use canopy_algorithms::metrics::MetricExtractor;
use canopy_algorithms::segmentation::{SegmentationParams, VegetationSegmenter};
use canopy_algorithms::timeseries::{
    ForecastParams, GrowthAnalyzer, GrowthParams, TrendForecaster, assemble,
};
use canopy_core::io::{
    ClimateIndex, ClimateReading, OverlayDir, append_reading, read_rgb, scan_image_dir,
    write_forecast, write_report,
};
use canopy_core::schedule::capture_times;
use canopy_core::{
    Algorithm, DiscardOverlays, Error, OrderingStrategy, OverlaySink, order_samples,
};

use config::StationConfig;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "canopy")]
#[command(author, version, about = "Plant growth analysis for the photo station", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Station config file (schedule and analysis thresholds)
    #[arg(short, long, global = true, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a directory of photos into a vegetation table and forecast
    Analyze(AnalyzeArgs),
    /// Segment one photo and print its metrics
    Inspect {
        /// Input photo
        image: PathBuf,
    },
    /// Print today's capture slots
    Schedule,
    /// Append one climate reading to the log
    LogClimate {
        /// Climate log CSV
        log: PathBuf,
        /// Photo taken with this reading
        #[arg(long)]
        image: String,
        /// Temperature in degrees Celsius
        #[arg(long, allow_hyphen_values = true)]
        temperature: f64,
        /// Pressure in pascal, as read from the sensor
        #[arg(long)]
        pressure: f64,
        /// Relative humidity in percent
        #[arg(long)]
        humidity: f64,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Directory of .jpg/.png photos
    images: PathBuf,
    /// Vegetation table
    #[arg(short, long, default_value = "plant_analysis.csv")]
    output: PathBuf,
    /// Directory for tinted overlay images
    #[arg(long, default_value = "overlay")]
    overlay_dir: PathBuf,
    /// Skip writing overlay images
    #[arg(long)]
    no_overlay: bool,
    /// Forecast table
    #[arg(short, long, default_value = "forecast.csv")]
    forecast: PathBuf,
    /// Capture order: date, mtime or lexical
    #[arg(long, default_value = "date")]
    order: String,
    /// Frames to project past the last photo (overrides config)
    #[arg(long)]
    horizon: Option<usize>,
    /// Climate log to join by image name
    #[arg(long)]
    climate_log: Option<PathBuf>,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn announce<A: Algorithm>(stage: &A) {
    debug!("{}: {}", stage.name(), stage.description());
}

fn parse_order(s: &str) -> Result<OrderingStrategy> {
    match s.parse::<OrderingStrategy>()? {
        OrderingStrategy::Explicit => {
            anyhow::bail!("Explicit order needs a caller-supplied list. Use date, mtime or lexical.")
        }
        strategy => Ok(strategy),
    }
}

// ─── Analyze ────────────────────────────────────────────────────────────

fn run_analyze(args: AnalyzeArgs, mut station: StationConfig) -> Result<()> {
    if let Some(h) = args.horizon {
        station.analysis.forecast_horizon = h;
    }
    let cfg = station.analysis;
    cfg.validate().context("Invalid analysis config")?;
    let strategy = parse_order(&args.order)?;

    let files = scan_image_dir(&args.images)
        .with_context(|| format!("Failed to list {}", args.images.display()))?;
    info!("Found {} photos in {}", files.len(), args.images.display());
    if strategy == OrderingStrategy::Lexical {
        warn!("Lexical order assumes file names sort chronologically");
    }
    let ordered = order_samples(files, strategy).context("Failed to order photos")?;

    let sink: Box<dyn OverlaySink> = if args.no_overlay {
        Box::new(DiscardOverlays)
    } else {
        Box::new(OverlayDir::new(&args.overlay_dir))
    };

    let start = Instant::now();
    let pb = spinner(&format!("Analysing {} photos...", ordered.len()));
    let assembly = assemble(&ordered, &cfg, sink.as_ref());
    pb.finish_and_clear();
    let assembly = assembly.context("Failed to analyse photos")?;

    let areas = assembly.areas();
    announce(&GrowthAnalyzer);
    let growth = GrowthAnalyzer
        .execute(areas.clone(), GrowthParams::from(&cfg))
        .context("No photo could be analysed")?;

    if let Some(path) = &args.climate_log {
        let climate = ClimateIndex::load(path)
            .with_context(|| format!("Failed to read climate log {}", path.display()))?;
        let mut joined = 0;
        for r in &assembly.records {
            if let Some(c) = climate.lookup(&r.image_id) {
                joined += 1;
                debug!(
                    "{}: {:.2} C, {:.2} hPa, {:.2} %RH at {}",
                    r.image_id, c.temperature, c.pressure, c.humidity, c.timestamp
                );
            }
        }
        info!("Climate readings for {joined} of {} photos", assembly.records.len());
    }

    for &i in &growth.anomalies {
        info!(
            "Anomaly at index {i}: {} (growth {:+})",
            assembly.records[i].image_id, growth.growth[i]
        );
    }

    announce(&TrendForecaster);
    let forecast = match TrendForecaster.execute(areas.clone(), ForecastParams::from(&cfg)) {
        Ok(fc) => Some(fc),
        Err(Error::InsufficientData { needed, got }) => {
            warn!("Forecast skipped: needs {needed} photos, have {got}");
            None
        }
        Err(e) => return Err(e).context("Failed to fit trend"),
    };

    // Vegetation table last: any earlier failure leaves the old table untouched
    if let Some(fc) = &forecast {
        write_forecast(&args.forecast, &fc.values, &areas).context("Failed to write forecast")?;
    }
    write_report(&args.output, &assembly.records, &growth.growth, &growth.anomalies)
        .context("Failed to write vegetation table")?;
    let elapsed = start.elapsed();

    done("Vegetation table", &args.output, elapsed);
    println!(
        "  Rows: {}, skipped: {}, anomalies: {}",
        assembly.records.len(),
        assembly.skipped.len(),
        growth.anomalies.len()
    );
    for s in &assembly.skipped {
        println!("  Skipped {}: {}", s.id, s.reason);
    }
    if let Some(fc) = forecast {
        println!("  Forecast saved to: {}", args.forecast.display());
        println!("  Trend: {:+.2} px/frame", fc.trend.slope);
    }
    if !args.no_overlay {
        println!("  Overlays in: {}", args.overlay_dir.display());
    }
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let station = StationConfig::load_or_default(&cli.config);

    match cli.command {
        Commands::Analyze(args) => run_analyze(args, station)?,

        Commands::Inspect { image } => {
            let cfg = station.analysis;
            cfg.validate().context("Invalid analysis config")?;
            let pb = spinner("Reading photo...");
            let photo = read_rgb(&image);
            pb.finish_and_clear();
            let photo = photo.context("Failed to read photo")?;

            let (photo_rows, photo_cols) = photo.shape();

            let start = Instant::now();
            announce(&VegetationSegmenter);
            let masks = VegetationSegmenter
                .execute(photo, SegmentationParams::from(&cfg))
                .context("Failed to segment photo")?;
            let (rows, cols) = masks.shape();
            let (row0, col0) = masks.origin;
            announce(&MetricExtractor);
            let m = MetricExtractor
                .execute(masks, ())
                .context("Failed to extract metrics")?;
            let elapsed = start.elapsed();

            println!("File: {}", image.display());
            println!("Dimensions: {} x {}", photo_cols, photo_rows);
            println!("Analysis window: {} x {} at ({}, {})", cols, rows, col0, row0);
            println!("Area: {} px", m.area);
            println!("Health: {:.4}", m.health);
            println!("Height: {} px", m.height);
            println!("Density: {:.4}", m.density);
            println!("  Processing time: {:.2?}", elapsed);
        }

        Commands::Schedule => {
            let sched = &station.schedule;
            if !sched.enabled {
                println!("Capture is disabled");
            }
            let now = Local::now().time();
            let slots = capture_times(sched);
            let next = slots
                .iter()
                .find(|s| (s.hour(), s.minute()) > (now.hour(), now.minute()));
            for slot in &slots {
                let marker = if Some(slot) == next { "  <- next" } else { "" };
                println!("{}{}", slot.format("%H:%M"), marker);
            }
        }

        Commands::LogClimate {
            log,
            image,
            temperature,
            pressure,
            humidity,
        } => {
            let reading = ClimateReading::from_sensor(
                Local::now().naive_local(),
                temperature,
                pressure,
                humidity,
                image,
            );
            append_reading(&log, &reading).context("Failed to append climate reading")?;
            info!(
                "Logged {:.2} C, {:.2} hPa, {:.2} %RH for {}",
                reading.temperature, reading.pressure, reading.humidity, reading.image_path
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::RgbBands;
    use canopy_core::io::{read_forecast, read_report, write_rgb};
    use std::fs;

    const OLD_TABLE: &str = "OLD TABLE\n";

    /// Three daily PNGs in `dir/images` with 1, 2 and 3 leaf pixels.
    fn seed_photos(dir: &Path) -> PathBuf {
        let images = dir.join("images");
        fs::create_dir(&images).unwrap();
        for day in 1..=3 {
            let mut photo = RgbBands::filled(10, 10, [60, 40, 30]);
            for col in 0..day {
                photo.set_pixel(4, 3 + col, [30, 180, 30]).unwrap();
            }
            write_rgb(&images.join(format!("2024-06-0{day}.png")), &photo).unwrap();
        }
        images
    }

    fn analyze_args(dir: &Path, images: PathBuf, forecast: PathBuf) -> AnalyzeArgs {
        AnalyzeArgs {
            images,
            output: dir.join("plant_analysis.csv"),
            overlay_dir: dir.join("overlay"),
            no_overlay: true,
            forecast,
            order: "date".to_string(),
            horizon: None,
            climate_log: None,
        }
    }

    #[test]
    fn test_analyze_writes_both_tables() {
        let dir = tempfile::tempdir().unwrap();
        let images = seed_photos(dir.path());
        let args = analyze_args(dir.path(), images, dir.path().join("forecast.csv"));
        let (output, forecast) = (args.output.clone(), args.forecast.clone());

        run_analyze(args, StationConfig::default()).unwrap();

        let rows = read_report(&output).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].area, 3);
        assert_eq!(read_forecast(&forecast).unwrap().len(), 3 + 30);
    }

    #[test]
    fn test_failed_forecast_write_keeps_old_table() {
        let dir = tempfile::tempdir().unwrap();
        let images = seed_photos(dir.path());
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let args = analyze_args(dir.path(), images, blocker.join("forecast.csv"));
        let output = args.output.clone();
        fs::write(&output, OLD_TABLE).unwrap();

        assert!(run_analyze(args, StationConfig::default()).is_err());
        assert_eq!(fs::read_to_string(&output).unwrap(), OLD_TABLE);
    }

    #[test]
    fn test_single_photo_writes_table_without_forecast() {
        let dir = tempfile::tempdir().unwrap();
        let images = seed_photos(dir.path());
        fs::remove_file(images.join("2024-06-02.png")).unwrap();
        fs::remove_file(images.join("2024-06-03.png")).unwrap();
        let args = analyze_args(dir.path(), images, dir.path().join("forecast.csv"));
        let (output, forecast) = (args.output.clone(), args.forecast.clone());

        run_analyze(args, StationConfig::default()).unwrap();

        assert_eq!(read_report(&output).unwrap().len(), 1);
        assert!(!forecast.exists());
    }
}
