use chrono::NaiveDate;
use thiserror::Error;

/// Why a model could not be fitted or extrapolated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("insufficient data: {observations} observations, the model needs at least {required}")]
    InsufficientData { observations: usize, required: usize },

    #[error("missing {column} value on {date}")]
    MissingCovariate { column: &'static str, date: NaiveDate },

    #[error("the forecast reuses the last {required} covariate rows but only {available} are available")]
    ExogenousShortfall { required: usize, available: usize },

    #[error("exogenous input has {found} values where {expected} are expected")]
    ExogenousShape { expected: usize, found: usize },

    #[error("singular regression design: exogenous covariates are collinear")]
    SingularDesign,

    #[error("numerical failure: non-finite {0}")]
    NonFinite(&'static str),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Skipping forecast for {brand} due to the following error: {cause}")]
pub struct ForecastError {
    pub brand: String,
    pub cause: FitError,
}
