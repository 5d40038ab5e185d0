//! Per-image vegetation metrics
//!
//! Area, health, height and density are exact functions of the two masks.

use canopy_core::{Algorithm, Error, MetricRecord, Result};

use crate::segmentation::VegetationMasks;

/// Metric values for one photo, before it is tied to an identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VegetationMetrics {
    pub area: u64,
    pub health: f64,
    pub height: u32,
    pub density: f64,
}

impl VegetationMetrics {
    pub fn into_record(self, image_id: impl Into<String>) -> MetricRecord {
        MetricRecord {
            image_id: image_id.into(),
            area: self.area,
            health: self.health,
            height: self.height,
            density: self.density,
        }
    }
}

/// Metric extraction algorithm
#[derive(Debug, Clone, Default)]
pub struct MetricExtractor;

impl Algorithm for MetricExtractor {
    type Input = VegetationMasks;
    type Output = VegetationMetrics;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "MetricExtractor"
    }

    fn description(&self) -> &'static str {
        "Canopy area, health ratio, height and density from vegetation masks"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        extract_metrics(&input)
    }
}

/// Compute the metrics of one pair of masks.
///
/// - `area`: green pixel count
/// - `health`: `area / (area + yellow + 1)`, so an empty frame gives 0
/// - `height`: mask rows minus the topmost green row, 0 with no green
/// - `density`: `area / pixel count`, 0 for an empty window
pub fn extract_metrics(masks: &VegetationMasks) -> Result<VegetationMetrics> {
    masks.check_shape()?;
    let rows = masks.green.rows();

    let area = masks.green.count_set() as u64;
    let yellow = masks.yellow.count_set() as u64;
    let health = area as f64 / (area + yellow + 1) as f64;
    let height = masks
        .green
        .first_set_row()
        .map_or(0, |top| (rows - top) as u32);
    let total = masks.green.len();
    let density = if total == 0 {
        0.0
    } else {
        area as f64 / total as f64
    };

    Ok(VegetationMetrics {
        area,
        health,
        height,
        density,
    })
}
