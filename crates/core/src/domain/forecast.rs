use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Estimated model parameters, reported next to the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub model: String,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
    /// One coefficient per exogenous column, zero for columns that were constant.
    pub exog: Vec<f64>,
    pub sigma2: f64,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub brand: String,
    /// In-sample one-step predictions, aligned with the brand series dates.
    pub fitted: Vec<f64>,
    pub forecast: Vec<ForecastPoint>,
    /// Mean absolute percentage error of `fitted`, in percent.
    pub mape: f64,
    pub summary: FitSummary,
}

impl ForecastResult {
    pub fn values(&self) -> Vec<f64> {
        self.forecast.iter().map(|p| p.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.forecast.iter().map(|p| p.date).collect()
    }
}
