use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One filtered row of the source table with its date coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub daily_sales: Option<f64>,
    pub exchange_rate: Option<f64>,
    pub price: Option<f64>,
    pub company: String,
    pub brand: String,
    /// 1-based line in the source CSV.
    pub line: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrandPoint {
    pub date: NaiveDate,
    pub daily_sales: f64,
    pub exchange_rate: Option<f64>,
    pub price: Option<f64>,
}

/// Cleaned, date-ordered history of a single brand.
///
/// Dates are strictly increasing. Sales are never zero. Covariate gaps are
/// filled, except a leading exchange-rate gap (nothing to carry forward) and
/// a price column with no observed value at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSeries {
    pub brand: String,
    pub points: Vec<BrandPoint>,
}

impl BrandSeries {
    pub fn new(brand: impl Into<String>, points: Vec<BrandPoint>) -> Self {
        Self {
            brand: brand.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn sales(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.daily_sales).collect()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn mean_sales(&self) -> Option<f64> {
        mean(self.points.iter().map(|p| p.daily_sales))
    }

    /// Mean of the last `window` observations (all of them if shorter).
    pub fn trailing_mean_sales(&self, window: usize) -> Option<f64> {
        let start = self.points.len().saturating_sub(window);
        mean(self.points[start..].iter().map(|p| p.daily_sales))
    }

    /// Number of covariate cells still missing after cleaning.
    pub fn missing_covariates(&self) -> usize {
        self.points
            .iter()
            .map(|p| usize::from(p.exchange_rate.is_none()) + usize::from(p.price.is_none()))
            .sum()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}
