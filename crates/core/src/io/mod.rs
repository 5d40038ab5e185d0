//! I/O for photos, overlays, report tables and the climate log
//!
//! Every artifact that replaces a previous one is written through
//! [`write_atomic`], so a crash mid-write leaves the old file in place.

mod atomic;
pub mod climate;
pub mod report;
mod source;

pub use atomic::write_atomic;
pub use climate::{ClimateIndex, ClimateReading, append_reading, read_climate_log};
pub use report::{ForecastRow, ReportRow, read_forecast, read_report, write_forecast, write_report};
pub use source::{ImageFile, OverlayDir, read_rgb, scan_image_dir, write_rgb};
