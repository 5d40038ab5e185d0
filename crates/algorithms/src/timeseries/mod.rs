//! Time-series stages: table assembly, growth analysis and trend forecast

pub mod assemble;
pub mod forecast;
pub mod growth;

pub use assemble::{Assembly, SkippedSample, assemble};
pub use forecast::{Forecast, ForecastParams, LinearTrend, TrendForecaster, fit_linear_trend, forecast};
pub use growth::{
    GrowthAnalysis, GrowthAnalyzer, GrowthParams, analyze_growth, detect_anomalies, growth_series,
    population_std_dev,
};

use crate::config::AnalysisConfig;

impl From<&AnalysisConfig> for GrowthParams {
    fn from(cfg: &AnalysisConfig) -> Self {
        Self {
            anomaly_multiplier: cfg.anomaly_multiplier,
        }
    }
}

impl From<&AnalysisConfig> for ForecastParams {
    fn from(cfg: &AnalysisConfig) -> Self {
        Self {
            horizon: cfg.forecast_horizon,
        }
    }
}
