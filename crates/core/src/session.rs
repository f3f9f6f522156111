//! Per-selection pipeline over an immutable, already filtered table.

use crate::domain::brand::{resolve_brand, BRANDS, TARGET_COMPANY};
use crate::domain::forecast::ForecastResult;
use crate::domain::sales::{BrandSeries, SalesRecord};
use crate::forecast::{ForecastEngine, ForecastError};
use crate::ingest::types::SalesTable;
use crate::insight::{generate_insights, Insight};
use crate::prep::{clean_brand, filter_records, PrepError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    #[error("unknown brand {0:?}")]
    UnknownBrand(String),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

/// Everything the presentation layer shows for one brand.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandReport {
    pub brand: String,
    pub series: BrandSeries,
    pub forecast: ForecastResult,
    pub insights: Vec<Insight>,
}

impl BrandReport {
    pub fn mape(&self) -> f64 {
        self.forecast.mape
    }
}

#[derive(Debug, Clone)]
pub struct ForecastSession {
    records: Vec<SalesRecord>,
    engine: ForecastEngine,
}

impl ForecastSession {
    /// Filters the table to the target company and brand allow-list. Date
    /// and number coercion happens here, so bad source data fails at startup.
    pub fn new(table: &SalesTable) -> Result<Self, PrepError> {
        Self::with_engine(table, ForecastEngine::default())
    }

    pub fn with_engine(table: &SalesTable, engine: ForecastEngine) -> Result<Self, PrepError> {
        let records = filter_records(table, TARGET_COMPANY, &BRANDS)?;
        tracing::info!(
            company = TARGET_COMPANY,
            records = records.len(),
            "forecast session ready"
        );
        Ok(Self { records, engine })
    }

    pub fn brands(&self) -> &'static [&'static str] {
        &BRANDS
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn series(&self, brand: &str) -> Result<BrandSeries, ReportError> {
        let brand = resolve_brand(brand).ok_or_else(|| ReportError::UnknownBrand(brand.to_string()))?;
        Ok(clean_brand(&self.records, brand))
    }

    /// Clean → forecast → insights for one brand.
    pub fn run(&self, brand: &str) -> Result<BrandReport, ReportError> {
        let series = self.series(brand)?;
        let forecast = self.engine.forecast(&series)?;
        let insights = generate_insights(&series);
        Ok(BrandReport {
            brand: series.brand.clone(),
            series,
            forecast,
            insights,
        })
    }
}
