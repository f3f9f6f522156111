use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use demand_core::report::{self, ReportView};
use demand_core::session::{ForecastSession, ReportError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = demand_core::config::Settings::from_env();
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let session = match load_session(&settings).await {
        Ok(session) => session,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %format!("{e:#}"), "sales data unavailable; not starting");
            return Err(e);
        }
    };

    let app = app(AppState {
        session: Arc::new(session),
    });

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn load_session(settings: &demand_core::config::Settings) -> anyhow::Result<ForecastSession> {
    let source = demand_core::ingest::source_from_settings(settings)?;
    let table = demand_core::ingest::load_table(source.as_ref())
        .await
        .with_context(|| format!("load sales data from {}", source.location()))?;
    ForecastSession::new(&table).context("filter sales data")
}

#[derive(Debug, Clone)]
struct AppState {
    session: Arc<ForecastSession>,
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/healthz", get(healthz))
        .route("/api/brands", get(list_brands))
        .route("/api/forecast/:brand", get(get_forecast))
        .route("/report/:brand", get(get_report_page))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn dashboard(State(state): State<AppState>) -> Html<String> {
    Html(report::dashboard_page(state.session.brands()))
}

async fn list_brands(State(state): State<AppState>) -> Json<&'static [&'static str]> {
    Json(state.session.brands())
}

#[derive(Debug, Serialize)]
struct ApiError {
    brand: String,
    error: String,
    message: String,
}

enum ForecastFailure {
    UnknownBrand(String),
    Unprocessable(ApiError),
    Internal,
}

impl IntoResponse for ForecastFailure {
    fn into_response(self) -> Response {
        match self {
            ForecastFailure::UnknownBrand(brand) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "brand": brand,
                    "error": "unknown brand",
                })),
            )
                .into_response(),
            ForecastFailure::Unprocessable(body) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            ForecastFailure::Internal => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// Fitting is CPU-bound, so it runs on the blocking pool.
async fn run_report(state: &AppState, brand: String) -> Result<ReportView, ForecastFailure> {
    let session = Arc::clone(&state.session);
    let requested = brand.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        session.run(&brand).map(|report| ReportView::from(&report))
    })
    .await
    .map_err(|e| {
        let err = anyhow::Error::new(e).context("forecast task failed");
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(brand = %requested, error = %format!("{err:#}"), "forecast task failed");
        ForecastFailure::Internal
    })?;

    outcome.map_err(|e| match e {
        ReportError::UnknownBrand(brand) => ForecastFailure::UnknownBrand(brand),
        ReportError::Forecast(err) => ForecastFailure::Unprocessable(ApiError {
            message: report::error_message(&err.brand, &err.cause),
            error: err.cause.to_string(),
            brand: err.brand,
        }),
    })
}

async fn get_forecast(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> Result<Json<ReportView>, ForecastFailure> {
    run_report(&state, brand).await.map(Json)
}

async fn get_report_page(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> Result<Html<String>, StatusCode> {
    match run_report(&state, brand).await {
        Ok(view) => report::report_page(&view)
            .map(Html)
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR),
        Err(ForecastFailure::UnknownBrand(_)) => Err(StatusCode::NOT_FOUND),
        Err(ForecastFailure::Unprocessable(body)) => {
            Ok(Html(report::error_page(&body.brand, &body.error)))
        }
        Err(ForecastFailure::Internal) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &demand_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
