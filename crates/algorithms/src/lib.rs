//! # Canopy Algorithms
//!
//! Vegetation analysis for the canopy plant-monitoring station.
//!
//! ## Stages
//!
//! - **segmentation**: HSV conversion and green/yellow range masks
//! - **metrics**: area, health, height and density per photo
//! - **overlay**: colour-tinted copies of each photo
//! - **timeseries**: ordered table assembly, growth anomalies, trend forecast

pub mod config;
pub mod metrics;
pub mod overlay;
pub mod segmentation;
pub mod timeseries;

mod maybe_rayon;

pub use config::{AnalysisConfig, CropRegion, HsvRange};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{AnalysisConfig, CropRegion, HsvRange};
    pub use crate::metrics::{MetricExtractor, VegetationMetrics, extract_metrics};
    pub use crate::overlay::tint_overlay;
    pub use crate::segmentation::{
        SegmentationParams, VegetationMasks, VegetationSegmenter, segment,
    };
    pub use crate::timeseries::{
        Assembly, Forecast, ForecastParams, GrowthAnalysis, GrowthAnalyzer, GrowthParams,
        SkippedSample, TrendForecaster, analyze_growth, assemble, forecast,
    };
    pub use canopy_core::prelude::*;
}
