//! Regression with seasonal ARIMA errors:
//!
//! ```text
//! y_t = beta . x_t + u_t
//! phi(B) Phi(B^s) (1 - B)^d (1 - B^s)^D u_t = theta(B) Theta(B^s) e_t
//! ```
//!
//! Estimated by conditional sum of squares on the differenced data. For each
//! candidate ARMA parameter set, `beta` is concentrated out by least squares
//! on the ARMA-filtered series, so the simplex only searches the ARMA
//! coefficients. Each coefficient is kept inside (-1, 1) through `tanh`.

use crate::domain::forecast::FitSummary;
use crate::forecast::error::FitError;
use crate::forecast::linalg::{dot, least_squares};
use crate::forecast::optim::{nelder_mead, NelderMeadOptions};
use crate::forecast::poly;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub period: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SarimaxSpec {
    pub order: Order,
    pub seasonal: SeasonalOrder,
}

impl SarimaxSpec {
    /// (1,1,1)(1,1,1,7): daily data with a weekly cycle.
    pub const WEEKLY: Self = Self {
        order: Order { p: 1, d: 1, q: 1 },
        seasonal: SeasonalOrder {
            p: 1,
            d: 1,
            q: 1,
            period: 7,
        },
    };

    pub fn label(&self) -> String {
        let (o, s) = (self.order, self.seasonal);
        format!(
            "SARIMAX({},{},{})({},{},{},{})",
            o.p, o.d, o.q, s.p, s.d, s.q, s.period
        )
    }

    fn n_arma(&self) -> usize {
        self.order.p + self.order.q + self.seasonal.p + self.seasonal.q
    }

    fn differencing(&self) -> Vec<f64> {
        poly::differencing(self.order.d, self.seasonal.d, self.seasonal.period)
    }

    fn differencing_lag(&self) -> usize {
        self.order.d + self.seasonal.d * self.seasonal.period
    }

    fn arma_lag(&self) -> usize {
        let ar = self.order.p + self.seasonal.p * self.seasonal.period;
        let ma = self.order.q + self.seasonal.q * self.seasonal.period;
        ar.max(ma)
    }

    /// Smallest history that leaves more residuals than free parameters.
    pub fn min_observations(&self, n_exog: usize) -> usize {
        self.differencing_lag() + self.arma_lag() + self.n_arma() + n_exog + 1
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ArmaParams {
    ar: Vec<f64>,
    ma: Vec<f64>,
    seasonal_ar: Vec<f64>,
    seasonal_ma: Vec<f64>,
}

impl ArmaParams {
    fn from_unconstrained(spec: &SarimaxSpec, raw: &[f64]) -> Self {
        let mut it = raw.iter().map(|v| v.tanh());
        let mut take = |n: usize| it.by_ref().take(n).collect::<Vec<f64>>();
        Self {
            ar: take(spec.order.p),
            ma: take(spec.order.q),
            seasonal_ar: take(spec.seasonal.p),
            seasonal_ma: take(spec.seasonal.q),
        }
    }

    /// `phi(B) Phi(B^s)`, with the `1 - ...` sign convention.
    fn ar_poly(&self, period: usize) -> Vec<f64> {
        poly::multiply(
            &poly::lag_polynomial(&self.ar, 1, -1.0),
            &poly::lag_polynomial(&self.seasonal_ar, period, -1.0),
        )
    }

    /// `theta(B) Theta(B^s)`, with the `1 + ...` sign convention.
    fn ma_poly(&self, period: usize) -> Vec<f64> {
        poly::multiply(
            &poly::lag_polynomial(&self.ma, 1, 1.0),
            &poly::lag_polynomial(&self.seasonal_ma, period, 1.0),
        )
    }
}

/// Innovations of `series` under the ARMA model, with pre-sample values set
/// to zero. The first `start` entries are zero.
fn arma_residuals(series: &[f64], ar: &[f64], ma: &[f64], start: usize) -> Vec<f64> {
    let mut e = vec![0.0; series.len()];
    for i in start..series.len() {
        let mut v = series[i];
        for (k, a) in ar.iter().enumerate().skip(1) {
            v += a * series[i - k];
        }
        for (j, m) in ma.iter().enumerate().skip(1).take(i) {
            v -= m * e[i - j];
        }
        e[i] = v;
    }
    e
}

/// Conditional sum of squares over differenced data, with the regression
/// coefficients concentrated out.
struct Css<'a> {
    period: usize,
    start: usize,
    endog: &'a [f64],
    exog: &'a [Vec<f64>],
}

impl Css<'_> {
    fn evaluate(&self, params: &ArmaParams) -> Option<(Vec<f64>, f64)> {
        let ar = params.ar_poly(self.period);
        let ma = params.ma_poly(self.period);
        let fy = arma_residuals(self.endog, &ar, &ma, self.start);
        let fx: Vec<Vec<f64>> = self
            .exog
            .iter()
            .map(|c| arma_residuals(c, &ar, &ma, self.start))
            .collect();

        let beta = least_squares(&fx, &fy, self.start)?;
        let sse: f64 = (self.start..fy.len())
            .map(|i| {
                let fit: f64 = fx.iter().zip(&beta).map(|(c, b)| c[i] * b).sum();
                (fy[i] - fit).powi(2)
            })
            .sum();

        sse.is_finite().then_some((beta, sse))
    }
}

#[derive(Debug, Clone)]
pub struct FittedSarimax {
    spec: SarimaxSpec,
    params: ArmaParams,
    exog_coefficients: Vec<f64>,
    sigma2: f64,
    endog: Vec<f64>,
    exog: Vec<Vec<f64>>,
    /// `y - beta . x`
    regression_errors: Vec<f64>,
    /// Differenced regression errors.
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    iterations: usize,
    converged: bool,
}

impl FittedSarimax {
    /// Fits the model. `exog` holds one column per regressor, each aligned
    /// with `endog`.
    pub fn fit(spec: SarimaxSpec, endog: &[f64], exog: &[Vec<f64>]) -> Result<Self, FitError> {
        let n = endog.len();
        let required = spec.min_observations(exog.len());
        if n < required {
            return Err(FitError::InsufficientData {
                observations: n,
                required,
            });
        }
        if let Some(col) = exog.iter().find(|c| c.len() != n) {
            return Err(FitError::ExogenousShape {
                expected: n,
                found: col.len(),
            });
        }
        if !endog.iter().chain(exog.iter().flatten()).all(|v| v.is_finite()) {
            return Err(FitError::NonFinite("input data"));
        }

        let delta = spec.differencing();
        let start = spec.arma_lag();
        let w = poly::apply(&delta, endog);
        let z_all: Vec<Vec<f64>> = exog.iter().map(|c| poly::apply(&delta, c)).collect();

        // A covariate that differencing turns into zeros over the estimation
        // window carries no signal.
        let active: Vec<usize> = (0..exog.len())
            .filter(|&j| z_all[j][start..].iter().any(|v| *v != 0.0))
            .collect();
        if active.len() < exog.len() {
            tracing::debug!(
                dropped = exog.len() - active.len(),
                "constant exogenous columns fixed at zero"
            );
        }
        let z: Vec<Vec<f64>> = active.iter().map(|&j| z_all[j].clone()).collect();
        if least_squares(&z, &w, start).is_none() {
            return Err(FitError::SingularDesign);
        }

        let css = Css {
            period: spec.seasonal.period,
            start,
            endog: &w,
            exog: &z,
        };
        let origin = vec![0.0; spec.n_arma()];
        let minimum = nelder_mead(
            |raw| {
                css.evaluate(&ArmaParams::from_unconstrained(&spec, raw))
                    .map_or(f64::INFINITY, |(_, sse)| sse)
            },
            &origin,
            &NelderMeadOptions::default(),
        );

        let params = ArmaParams::from_unconstrained(&spec, &minimum.point);
        let (beta, sse) = css
            .evaluate(&params)
            .ok_or(FitError::NonFinite("conditional sum of squares"))?;

        let mut exog_coefficients = vec![0.0; exog.len()];
        for (&j, b) in active.iter().zip(&beta) {
            exog_coefficients[j] = *b;
        }

        let regression_errors: Vec<f64> = (0..n)
            .map(|t| endog[t] - regression_term(exog, &exog_coefficients, t))
            .collect();
        let differenced = poly::apply(&delta, &regression_errors);
        let residuals = arma_residuals(
            &differenced,
            &params.ar_poly(spec.seasonal.period),
            &params.ma_poly(spec.seasonal.period),
            start,
        );
        let sigma2 = sse / (differenced.len() - start) as f64;

        if !minimum.converged {
            tracing::warn!(
                iterations = minimum.iterations,
                sse,
                "simplex stopped at the iteration limit"
            );
        }

        Ok(Self {
            spec,
            params,
            exog_coefficients,
            sigma2,
            endog: endog.to_vec(),
            exog: exog.to_vec(),
            regression_errors,
            differenced,
            residuals,
            iterations: minimum.iterations,
            converged: minimum.converged,
        })
    }

    /// One-step-ahead in-sample predictions, aligned with the training data.
    ///
    /// Before a full differencing window exists the prediction is a random
    /// walk on the regression errors; the first observation is reproduced.
    pub fn fitted_values(&self) -> Vec<f64> {
        let lag = self.spec.differencing_lag();
        let start = self.spec.arma_lag();
        (0..self.endog.len())
            .map(|t| {
                if t >= lag {
                    let i = t - lag;
                    let surprise = if i >= start {
                        self.residuals[i]
                    } else {
                        self.differenced[i]
                    };
                    self.endog[t] - surprise
                } else if t == 0 {
                    self.endog[0]
                } else {
                    self.regression_errors[t - 1]
                        + regression_term(&self.exog, &self.exog_coefficients, t)
                }
            })
            .collect()
    }

    /// Point forecasts for `steps` periods past the training data, given the
    /// regressors for those periods (one column per regressor).
    pub fn forecast(&self, future_exog: &[Vec<f64>], steps: usize) -> Result<Vec<f64>, FitError> {
        if future_exog.len() != self.exog.len() {
            return Err(FitError::ExogenousShape {
                expected: self.exog.len(),
                found: future_exog.len(),
            });
        }
        if let Some(col) = future_exog.iter().find(|c| c.len() != steps) {
            return Err(FitError::ExogenousShape {
                expected: steps,
                found: col.len(),
            });
        }

        let period = self.spec.seasonal.period;
        let ar = self.params.ar_poly(period);
        let ma = self.params.ma_poly(period);
        let delta = self.spec.differencing();

        let mut u = self.regression_errors.clone();
        let mut w = self.differenced.clone();
        let mut e = self.residuals.clone();
        let mut out = Vec::with_capacity(steps);

        for h in 0..steps {
            let i = w.len();
            let mut next = 0.0;
            for (k, a) in ar.iter().enumerate().skip(1) {
                next -= a * w[i - k];
            }
            for (j, m) in ma.iter().enumerate().skip(1) {
                next += m * e[i - j];
            }
            w.push(next);
            e.push(0.0);

            let t = u.len();
            let mut level = next;
            for (k, c) in delta.iter().enumerate().skip(1) {
                level -= c * u[t - k];
            }
            u.push(level);

            out.push(level + regression_term(future_exog, &self.exog_coefficients, h));
        }

        if out.iter().all(|v| v.is_finite()) {
            Ok(out)
        } else {
            Err(FitError::NonFinite("forecast"))
        }
    }

    pub fn summary(&self) -> FitSummary {
        FitSummary {
            model: self.spec.label(),
            ar: self.params.ar.clone(),
            ma: self.params.ma.clone(),
            seasonal_ar: self.params.seasonal_ar.clone(),
            seasonal_ma: self.params.seasonal_ma.clone(),
            exog: self.exog_coefficients.clone(),
            sigma2: self.sigma2,
            iterations: self.iterations,
            converged: self.converged,
        }
    }
}

fn regression_term(columns: &[Vec<f64>], coefficients: &[f64], t: usize) -> f64 {
    let row: Vec<f64> = columns.iter().map(|c| c[t]).collect();
    dot(&row, coefficients)
}
