//! Per-image vegetation metrics

/// One row of the vegetation table, derived from one photo.
///
/// Records are kept in ascending capture order; every time-series product
/// downstream is index-aligned with that order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    /// Sample identifier (file name), unique within a run
    pub image_id: String,
    /// Green-classified pixel count
    pub area: u64,
    /// `green / (green + yellow + 1)`, in [0, 1)
    pub health: f64,
    /// Rows from the topmost green pixel to the bottom of the analysis region
    pub height: u32,
    /// Green fraction of the analysis region, in [0, 1]
    pub density: f64,
}

impl MetricRecord {
    /// Pull the `area` column out of an ordered table.
    pub fn areas(records: &[MetricRecord]) -> Vec<u64> {
        records.iter().map(|r| r.area).collect()
    }
}
