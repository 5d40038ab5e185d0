//! Colour-based vegetation segmentation
//!
//! Crops the analysis window out of a photo, converts it to HSV and tests
//! every pixel against the green and yellow ranges independently. There is
//! no morphological cleanup, so results are sensitive to lighting; a pixel
//! on a shared boundary hue lands in both masks.

mod hsv;
mod threshold;

pub use hsv::{HsvBands, rgb_to_hsv, to_hsv};
pub use threshold::in_range;

use canopy_core::raster::Raster;
use canopy_core::{Algorithm, Error, Result, RgbBands};
use tracing::trace;

use crate::config::{AnalysisConfig, CropRegion, HsvRange};

/// Parameters for vegetation segmentation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentationParams {
    pub green: HsvRange,
    pub yellow: HsvRange,
    pub crop: CropRegion,
}

impl Default for SegmentationParams {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for SegmentationParams {
    fn from(cfg: &AnalysisConfig) -> Self {
        Self {
            green: cfg.green,
            yellow: cfg.yellow,
            crop: cfg.crop,
        }
    }
}

/// Green and yellow masks over the analysis window of one photo.
#[derive(Debug, Clone, PartialEq)]
pub struct VegetationMasks {
    pub green: Raster<u8>,
    pub yellow: Raster<u8>,
    /// Top-left corner of the window in the source photo (row, col)
    pub origin: (usize, usize),
}

impl VegetationMasks {
    pub fn shape(&self) -> (usize, usize) {
        self.green.shape()
    }

    /// Fail with `SizeMismatch` unless the yellow mask matches the green one.
    pub fn check_shape(&self) -> Result<()> {
        let (rows, cols) = self.shape();
        self.yellow.require_shape(rows, cols)
    }
}

/// Vegetation segmentation algorithm
#[derive(Debug, Clone, Default)]
pub struct VegetationSegmenter;

impl Algorithm for VegetationSegmenter {
    type Input = RgbBands;
    type Output = VegetationMasks;
    type Params = SegmentationParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "VegetationSegmenter"
    }

    fn description(&self) -> &'static str {
        "Green and yellow canopy masks from HSV range thresholds"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        segment(&input, &params)
    }
}

/// Segment one photo into green and yellow masks.
pub fn segment(image: &RgbBands, params: &SegmentationParams) -> Result<VegetationMasks> {
    let (rows, cols) = image.shape();
    let (row0, col0, win_rows, win_cols) = params.crop.window(rows, cols);
    trace!("Analysis window {win_rows}x{win_cols} at ({row0}, {col0}) of {rows}x{cols}");

    let window = image.crop(row0, col0, win_rows, win_cols)?;
    let hsv = to_hsv(&window)?;

    Ok(VegetationMasks {
        green: in_range(&hsv, &params.green)?,
        yellow: in_range(&hsv, &params.yellow)?,
        origin: (row0, col0),
    })
}
