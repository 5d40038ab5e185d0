//! # Canopy Core
//!
//! Core types, traits and I/O for the canopy plant-monitoring station.
//!
//! This crate provides:
//! - `Raster<T>`: generic 2D grid used for colour bands and masks
//! - `RgbBands`: a decoded photo as three `u8` bands
//! - `MetricRecord`: one row of the vegetation table
//! - Capture ordering strategies and the daily capture schedule
//! - I/O for photos, overlays, report tables and the climate log

pub mod bands;
pub mod error;
pub mod io;
pub mod ordering;
pub mod raster;
pub mod record;
pub mod sample;
pub mod schedule;

pub use bands::RgbBands;
pub use error::{Error, Result};
pub use ordering::{OrderedSample, OrderingStrategy, order_samples, parse_capture_time};
pub use raster::{Raster, RasterElement};
pub use record::MetricRecord;
pub use sample::{CaptureKey, DiscardOverlays, ImageSource, MemorySample, OverlaySink};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bands::RgbBands;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{Raster, RasterElement};
    pub use crate::record::MetricRecord;
    pub use crate::sample::{ImageSource, OverlaySink};
    pub use crate::Algorithm;
}

/// A pipeline stage: a pure transform of `Input` into `Output`, tuned by `Params`.
///
/// Segmentation, metric extraction, growth analysis and forecasting all
/// implement this, so callers can run any stage with its defaults.
pub trait Algorithm {
    type Input;
    type Output;
    /// Tunables; `Default` is the station's stock configuration
    type Params: Default;
    type Error: std::error::Error;

    /// Short stage name for logs
    fn name(&self) -> &'static str;

    /// One-line summary of what the stage computes
    fn description(&self) -> &'static str;

    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Run with stock parameters.
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
