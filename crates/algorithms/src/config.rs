//! Analysis configuration
//!
//! Every threshold the pipeline uses lives here so a deployment can tune it
//! from the station config file instead of editing code.

use canopy_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest hue on the 8-bit scale (degrees / 2).
pub const MAX_HUE: u8 = 179;

/// Inclusive hue/saturation/value box. Hue uses the 8-bit 0..=179 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// Healthy canopy: hue 35..=85
    pub const GREEN: Self = Self::new([35, 40, 40], [85, 255, 255]);

    /// Stressed or senescent canopy: hue 20..=35
    pub const YELLOW: Self = Self::new([20, 40, 40], [35, 255, 255]);

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }

    pub fn validate(&self, name: &'static str) -> Result<()> {
        if self.upper[0] > MAX_HUE {
            return Err(Error::InvalidParameter {
                name,
                value: format!("{:?}", self.upper),
                reason: format!("hue above {MAX_HUE}"),
            });
        }
        if (0..3).any(|c| self.lower[c] > self.upper[c]) {
            return Err(Error::InvalidParameter {
                name,
                value: format!("{:?}..={:?}", self.lower, self.upper),
                reason: "lower bound exceeds upper bound".into(),
            });
        }
        Ok(())
    }
}

/// Centre window of the frame that is analysed.
///
/// `margin` of the height is trimmed from the top and from the bottom, and
/// likewise for the width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub margin: f64,
}

impl Default for CropRegion {
    fn default() -> Self {
        Self { margin: 0.2 }
    }
}

impl CropRegion {
    /// Full frame
    pub const NONE: Self = Self { margin: 0.0 };

    /// Window for a `rows` x `cols` frame as `(row0, col0, rows, cols)`.
    ///
    /// Bounds are truncated toward zero, so a 100-row frame with the default
    /// margin keeps rows 20..80.
    pub fn window(&self, rows: usize, cols: usize) -> (usize, usize, usize, usize) {
        let (r0, r1) = self.span(rows);
        let (c0, c1) = self.span(cols);
        (r0, c0, r1 - r0, c1 - c0)
    }

    fn span(&self, len: usize) -> (usize, usize) {
        let start = (len as f64 * self.margin) as usize;
        let end = ((len as f64 * (1.0 - self.margin)) as usize).clamp(start, len);
        (start, end)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..0.5).contains(&self.margin) {
            return Err(Error::InvalidParameter {
                name: "crop.margin",
                value: self.margin.to_string(),
                reason: "must be in [0, 0.5)".into(),
            });
        }
        Ok(())
    }
}

/// Thresholds and constants for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub green: HsvRange,
    pub yellow: HsvRange,
    pub crop: CropRegion,
    /// Frames projected past the last observation
    pub forecast_horizon: usize,
    /// Anomaly threshold in population standard deviations of growth
    pub anomaly_multiplier: f64,
    /// Tint strength for overlay images, 0 (none) to 1 (solid colour)
    pub overlay_alpha: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            green: HsvRange::GREEN,
            yellow: HsvRange::YELLOW,
            crop: CropRegion::default(),
            forecast_horizon: 30,
            anomaly_multiplier: 2.0,
            overlay_alpha: 0.5,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        self.green.validate("green")?;
        self.yellow.validate("yellow")?;
        self.crop.validate()?;
        if !self.anomaly_multiplier.is_finite() || self.anomaly_multiplier < 0.0 {
            return Err(Error::InvalidParameter {
                name: "anomaly_multiplier",
                value: self.anomaly_multiplier.to_string(),
                reason: "must be a non-negative number".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.overlay_alpha) {
            return Err(Error::InvalidParameter {
                name: "overlay_alpha",
                value: self.overlay_alpha.to_string(),
                reason: "must be in [0, 1]".into(),
            });
        }
        Ok(())
    }
}
