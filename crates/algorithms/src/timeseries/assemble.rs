//! Time-series assembly
//!
//! Runs segmentation and metric extraction over an ordered batch and folds
//! the results into one metric table. A sample that cannot be decoded is
//! logged and left out; every other failure aborts the batch.

use canopy_core::{Error, ImageSource, MetricRecord, OrderedSample, OverlaySink, Result};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::maybe_rayon::*;
use crate::metrics::extract_metrics;
use crate::overlay::tint_overlay;
use crate::segmentation::{SegmentationParams, segment};

/// A sample left out of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSample {
    pub id: String,
    pub reason: String,
}

/// Ordered metric table plus the samples that were skipped.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub records: Vec<MetricRecord>,
    pub skipped: Vec<SkippedSample>,
}

impl Assembly {
    pub fn areas(&self) -> Vec<u64> {
        MetricRecord::areas(&self.records)
    }
}

enum Outcome {
    Measured(MetricRecord),
    Skipped(SkippedSample),
}

/// Build the metric table for `samples`, which must already be in capture
/// order. Samples are processed in parallel; the table keeps their order.
///
/// One overlay per measured sample is handed to `overlays`.
pub fn assemble<S: ImageSource>(
    samples: &[OrderedSample<S>],
    config: &AnalysisConfig,
    overlays: &dyn OverlaySink,
) -> Result<Assembly> {
    config.validate()?;
    let params = SegmentationParams::from(config);

    let outcomes: Vec<Outcome> = samples
        .into_par_iter()
        .map(|sample| process(&sample.source, &params, config.overlay_alpha, overlays))
        .collect::<Result<Vec<_>>>()?;

    let assembly = outcomes
        .into_iter()
        .fold(Assembly::default(), |mut acc, outcome| {
            match outcome {
                Outcome::Measured(record) => {
                    debug!(
                        "{}: area={} health={:.3} height={} density={:.4}",
                        record.image_id, record.area, record.health, record.height, record.density
                    );
                    acc.records.push(record);
                }
                Outcome::Skipped(skip) => {
                    warn!("Skipping {}: {}", skip.id, skip.reason);
                    acc.skipped.push(skip);
                }
            }
            acc
        });

    Ok(assembly)
}

fn process<S: ImageSource>(
    source: &S,
    params: &SegmentationParams,
    alpha: f64,
    overlays: &dyn OverlaySink,
) -> Result<Outcome> {
    let image = match source.load() {
        Ok(image) => image,
        Err(Error::Decode { id, reason }) => {
            return Ok(Outcome::Skipped(SkippedSample { id, reason }));
        }
        Err(e) => return Err(e),
    };

    let masks = segment(&image, params)?;
    let metrics = extract_metrics(&masks)?;
    overlays.write_overlay(source.id(), &tint_overlay(&image, &masks, alpha)?)?;

    Ok(Outcome::Measured(metrics.into_record(source.id())))
}
