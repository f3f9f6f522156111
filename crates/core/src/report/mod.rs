//! What the dashboard, the report endpoint and the CLI show for a brand.

pub mod chart;
pub mod page;

pub use chart::{forecast_figure, Figure};
pub use page::{dashboard_page, error_page, report_page};

use crate::domain::forecast::{FitSummary, ForecastPoint};
use crate::session::BrandReport;
use serde::Serialize;
use std::fmt::Display;

pub fn format_mape(brand: &str, mape: f64) -> String {
    format!("Mean Absolute Percentage Error for {brand}: {mape:.2}%")
}

pub fn error_message(brand: &str, err: impl Display) -> String {
    format!("Error occurred during the forecast for {brand}: {err}")
}

/// Serialisable view of a [`BrandReport`]; the JSON body of
/// `/api/forecast/{brand}` and the CLI `--json` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub brand: String,
    pub observations: usize,
    pub mape: f64,
    pub mape_text: String,
    pub insights: Vec<String>,
    pub forecast: Vec<ForecastPoint>,
    pub summary: FitSummary,
    pub figure: Figure,
}

impl From<&BrandReport> for ReportView {
    fn from(report: &BrandReport) -> Self {
        let figure = forecast_figure(
            &report.brand,
            &report.series.dates(),
            report.series.sales(),
            &report.forecast.dates(),
            report.forecast.values(),
        );
        Self {
            brand: report.brand.clone(),
            observations: report.series.len(),
            mape: report.forecast.mape,
            mape_text: format_mape(&report.brand, report.forecast.mape),
            insights: report.insights.iter().map(|i| i.text.clone()).collect(),
            forecast: report.forecast.forecast.clone(),
            summary: report.forecast.summary.clone(),
            figure,
        }
    }
}
