//! Growth rate and anomaly detection
//!
//! The threshold is computed once over the whole series, so an early point
//! is judged against variability that includes later points.

use canopy_core::{Algorithm, Error, Result};

/// Parameters for growth analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthParams {
    /// Flag `|growth| > multiplier * stddev(growth)`
    pub anomaly_multiplier: f64,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            anomaly_multiplier: 2.0,
        }
    }
}

/// Growth series and anomaly flags, index-aligned with the input areas.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthAnalysis {
    pub growth: Vec<i64>,
    pub threshold: f64,
    /// Ascending indices whose growth magnitude exceeds `threshold`
    pub anomalies: Vec<usize>,
}

impl GrowthAnalysis {
    pub fn is_anomaly(&self, index: usize) -> bool {
        self.anomalies.binary_search(&index).is_ok()
    }
}

/// Growth and anomaly analysis algorithm
#[derive(Debug, Clone, Default)]
pub struct GrowthAnalyzer;

impl Algorithm for GrowthAnalyzer {
    type Input = Vec<u64>;
    type Output = GrowthAnalysis;
    type Params = GrowthParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "GrowthAnalyzer"
    }

    fn description(&self) -> &'static str {
        "Frame-to-frame area growth with standard-deviation anomaly flags"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        analyze_growth(&input, params)
    }
}

/// `g[0] = 0`, `g[i] = area[i] - area[i-1]`.
pub fn growth_series(areas: &[u64]) -> Result<Vec<i64>> {
    if areas.is_empty() {
        return Err(Error::EmptySeries);
    }
    let mut growth = Vec::with_capacity(areas.len());
    growth.push(0);
    growth.extend(areas.windows(2).map(|w| w[1] as i64 - w[0] as i64));
    Ok(growth)
}

/// Standard deviation with divisor N.
pub fn population_std_dev(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    var.sqrt()
}

/// Indices where `|growth|` strictly exceeds `threshold`.
pub fn detect_anomalies(growth: &[i64], threshold: f64) -> Vec<usize> {
    growth
        .iter()
        .enumerate()
        .filter(|&(_, &g)| (g as f64).abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Growth series, threshold and anomaly set for an ordered area column.
pub fn analyze_growth(areas: &[u64], params: GrowthParams) -> Result<GrowthAnalysis> {
    let growth = growth_series(areas)?;
    let threshold = params.anomaly_multiplier * population_std_dev(&growth);
    let anomalies = detect_anomalies(&growth, threshold);
    Ok(GrowthAnalysis {
        growth,
        threshold,
        anomalies,
    })
}
