//! Forecast engine: SARIMAX fit per brand, 365-day extrapolation and the
//! in-sample MAPE.

pub mod error;
pub mod linalg;
pub mod metrics;
pub mod optim;
pub mod poly;
pub mod sarimax;

pub use error::{FitError, ForecastError};
pub use sarimax::{FittedSarimax, Order, SarimaxSpec, SeasonalOrder};

use crate::domain::brand::FORECAST_HORIZON_DAYS;
use crate::domain::forecast::{ForecastPoint, ForecastResult};
use crate::domain::sales::BrandSeries;
use chrono::Duration;

const EXCHANGE_RATE: &str = "USD/LBP Rate";
const PRICE: &str = "Price";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastEngine {
    spec: SarimaxSpec,
    horizon: usize,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new(SarimaxSpec::WEEKLY, FORECAST_HORIZON_DAYS)
    }
}

impl ForecastEngine {
    pub fn new(spec: SarimaxSpec, horizon: usize) -> Self {
        Self { spec, horizon }
    }

    pub fn spec(&self) -> SarimaxSpec {
        self.spec
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Fits the brand's history and forecasts `horizon` days past its last
    /// date.
    ///
    /// The regressors for the forecast window are the last `horizon` observed
    /// covariate rows, in order. They are history, not projected covariates,
    /// so the forecast assumes the recent covariate path repeats.
    pub fn forecast(&self, series: &BrandSeries) -> Result<ForecastResult, ForecastError> {
        self.try_forecast(series).map_err(|cause| {
            tracing::warn!(brand = %series.brand, error = %cause, "forecast failed");
            ForecastError {
                brand: series.brand.clone(),
                cause,
            }
        })
    }

    fn try_forecast(&self, series: &BrandSeries) -> Result<ForecastResult, FitError> {
        let observations = series.len();
        let required = self.spec.min_observations(2);
        if observations < required {
            return Err(FitError::InsufficientData {
                observations,
                required,
            });
        }
        if observations < self.horizon {
            return Err(FitError::ExogenousShortfall {
                required: self.horizon,
                available: observations,
            });
        }

        let exog = exog_columns(series)?;
        let endog = series.sales();
        let t0 = std::time::Instant::now();
        let model = FittedSarimax::fit(self.spec, &endog, &exog)?;

        let future: Vec<Vec<f64>> = exog
            .iter()
            .map(|c| c[c.len() - self.horizon..].to_vec())
            .collect();
        let values = model.forecast(&future, self.horizon)?;

        let last = series
            .last_date()
            .ok_or(FitError::InsufficientData {
                observations,
                required,
            })?;
        let forecast: Vec<ForecastPoint> = values
            .into_iter()
            .enumerate()
            .map(|(h, value)| ForecastPoint {
                date: last + Duration::days(h as i64 + 1),
                value,
            })
            .collect();

        let fitted = model.fitted_values();
        let mape = metrics::mean_absolute_percentage_error(&endog, &fitted)
            .filter(|v| v.is_finite())
            .ok_or(FitError::NonFinite("MAPE"))?;
        let summary = model.summary();

        tracing::info!(
            brand = %series.brand,
            model = %summary.model,
            observations,
            horizon = self.horizon,
            mape,
            iterations = summary.iterations,
            converged = summary.converged,
            elapsed_ms = t0.elapsed().as_millis(),
            "fitted forecast model"
        );

        Ok(ForecastResult {
            brand: series.brand.clone(),
            fitted,
            forecast,
            mape,
            summary,
        })
    }
}

/// Exchange rate and price columns; any gap left after cleaning is an error.
fn exog_columns(series: &BrandSeries) -> Result<Vec<Vec<f64>>, FitError> {
    let mut rate = Vec::with_capacity(series.len());
    let mut price = Vec::with_capacity(series.len());
    for p in &series.points {
        rate.push(p.exchange_rate.ok_or(FitError::MissingCovariate {
            column: EXCHANGE_RATE,
            date: p.date,
        })?);
        price.push(p.price.ok_or(FitError::MissingCovariate {
            column: PRICE,
            date: p.date,
        })?);
    }
    Ok(vec![rate, price])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sales::BrandSeries;
    use crate::fixtures::daily_series;

    #[test]
    fn forecasts_full_horizon_on_contiguous_days() {
        let series = daily_series("MARLBORO", 1095);
        let result = ForecastEngine::default().forecast(&series).unwrap();

        assert_eq!(result.brand, "MARLBORO");
        assert_eq!(result.forecast.len(), FORECAST_HORIZON_DAYS);
        assert_eq!(result.fitted.len(), series.len());

        let last = series.last_date().unwrap();
        assert_eq!(result.forecast[0].date, last + Duration::days(1));
        for w in result.forecast.windows(2) {
            assert_eq!(w[1].date - w[0].date, Duration::days(1));
        }
        assert!(result.mape.is_finite() && result.mape >= 0.0);
        assert!(result.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let series = daily_series("HEETS", 400);
        let engine = ForecastEngine::default();
        let a = engine.forecast(&series).unwrap();
        let b = engine.forecast(&series).unwrap();
        assert_eq!(a.values(), b.values());
        assert_eq!(a, b);
    }

    #[test]
    fn two_rows_fail_with_brand_named() {
        let series = daily_series("BOND", 2);
        let err = ForecastEngine::default().forecast(&series).unwrap_err();
        assert_eq!(err.brand, "BOND");
        assert!(matches!(
            err.cause,
            FitError::InsufficientData { observations: 2, .. }
        ));
        assert!(err.to_string().contains("BOND"));
    }

    #[test]
    fn empty_series_fails_with_brand_named() {
        let series = BrandSeries::new("CHESTERFIELD", Vec::new());
        let err = ForecastEngine::default().forecast(&series).unwrap_err();
        assert!(err.to_string().contains("CHESTERFIELD"));
    }

    #[test]
    fn history_shorter_than_horizon_is_rejected() {
        let series = daily_series("FIIT", 200);
        let err = ForecastEngine::default().forecast(&series).unwrap_err();
        assert_eq!(
            err.cause,
            FitError::ExogenousShortfall {
                required: 365,
                available: 200
            }
        );
    }

    #[test]
    fn shorter_horizon_accepts_shorter_history() {
        let series = daily_series("FIIT", 200);
        let engine = ForecastEngine::new(SarimaxSpec::WEEKLY, 30);
        let result = engine.forecast(&series).unwrap();
        assert_eq!(result.forecast.len(), 30);
    }

    #[test]
    fn leading_exchange_rate_gap_fails_fitting() {
        let mut series = daily_series("MERIT", 400);
        series.points[0].exchange_rate = None;
        let err = ForecastEngine::default().forecast(&series).unwrap_err();
        assert_eq!(
            err.cause,
            FitError::MissingCovariate {
                column: "USD/LBP Rate",
                date: series.points[0].date,
            }
        );
    }

    #[test]
    fn early_one_off_price_change_still_fits() {
        let mut series = daily_series("MARLBORO", 800);
        for p in series.points.iter_mut() {
            p.price = Some(4.0);
        }
        series.points[3].price = Some(4.25);
        let result = ForecastEngine::default().forecast(&series).unwrap();
        assert_eq!(result.forecast.len(), FORECAST_HORIZON_DAYS);
        assert_eq!(result.summary.exog[1], 0.0);
    }
}
