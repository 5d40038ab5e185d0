//! Linear trend forecast of canopy area
//!
//! Ordinary least squares of area against frame index, solved in closed form
//! with the index centred on its mean so the sums stay small for long series.

use canopy_core::{Algorithm, Error, Result};

/// Parameters for the trend forecast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastParams {
    /// Frames projected past the last observation
    pub horizon: usize,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self { horizon: 30 }
    }
}

/// `value = slope * index + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    #[inline]
    pub fn at(&self, index: f64) -> f64 {
        self.slope * index + self.intercept
    }
}

/// Fitted trend evaluated at every index in `[0, observed + horizon)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub trend: LinearTrend,
    pub observed: usize,
    pub values: Vec<f64>,
}

impl Forecast {
    /// Values past the last observation
    pub fn projected(&self) -> &[f64] {
        &self.values[self.observed..]
    }
}

/// Trend forecast algorithm
#[derive(Debug, Clone, Default)]
pub struct TrendForecaster;

impl Algorithm for TrendForecaster {
    type Input = Vec<u64>;
    type Output = Forecast;
    type Params = ForecastParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "TrendForecaster"
    }

    fn description(&self) -> &'static str {
        "Least-squares linear trend of canopy area, projected forward"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        forecast(&input, params)
    }
}

/// Least-squares line through `(i, values[i])`. Needs at least two points.
pub fn fit_linear_trend(values: &[f64]) -> Result<LinearTrend> {
    let n = values.len();
    if n < 2 {
        return Err(Error::InsufficientData { needed: 2, got: n });
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxx += dx * dx;
        sxy += dx * (y - y_mean);
    }

    let slope = sxy / sxx;
    Ok(LinearTrend {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// Fit the area column and evaluate the line over `[0, N + horizon)`.
pub fn forecast(areas: &[u64], params: ForecastParams) -> Result<Forecast> {
    let values: Vec<f64> = areas.iter().map(|&a| a as f64).collect();
    let trend = fit_linear_trend(&values)?;
    let len = areas.len() + params.horizon;
    Ok(Forecast {
        trend,
        observed: areas.len(),
        values: (0..len).map(|i| trend.at(i as f64)).collect(),
    })
}
