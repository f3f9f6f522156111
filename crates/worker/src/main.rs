use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use demand_core::report::ReportView;
use demand_core::session::{ForecastSession, ReportError};

mod output;

#[derive(Debug, Parser)]
#[command(name = "demand_worker")]
struct Args {
    /// Brand to forecast; repeat for several. Defaults to every brand.
    #[arg(long = "brand")]
    brands: Vec<String>,

    /// Print one JSON report per line instead of text.
    #[arg(long)]
    json: bool,

    /// Also write a standalone `<brand>.html` report here.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Read the sales CSV from this file instead of DATA_URL.
    #[arg(long)]
    data_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = demand_core::config::Settings::from_env();
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if let Some(path) = args.data_path.clone() {
        settings.data_path = Some(path);
    }

    let brands = output::resolve_brands(&args.brands)?;

    let source = demand_core::ingest::source_from_settings(&settings)?;
    let table = demand_core::ingest::load_table(source.as_ref())
        .await
        .with_context(|| format!("load sales data from {}", source.location()));
    let session = match table.and_then(|t| ForecastSession::new(&t).context("filter sales data")) {
        Ok(session) => Arc::new(session),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            return Err(e);
        }
    };

    let mut failed = 0usize;
    for brand in &brands {
        let session = Arc::clone(&session);
        let name = brand.to_string();
        let report = tokio::task::spawn_blocking(move || session.run(&name))
            .await
            .context("forecast task failed")?;

        let view = match report {
            Ok(report) => ReportView::from(&report),
            Err(ReportError::Forecast(err)) => {
                failed += 1;
                tracing::error!(brand = %err.brand, error = %err.cause, "forecast failed");
                sentry_anyhow::capture_anyhow(&anyhow::Error::new(err));
                continue;
            }
            Err(e @ ReportError::UnknownBrand(_)) => return Err(e.into()),
        };

        if args.json {
            println!("{}", serde_json::to_string(&view)?);
        } else {
            print!("{}", output::render_text(&view));
        }

        if let Some(dir) = &args.output_dir {
            let path = output::write_report_page(dir, &view)?;
            tracing::info!(brand = %view.brand, path = %path.display(), "wrote report page");
        }
    }

    tracing::info!(brands = brands.len(), failed, "forecast run finished");
    anyhow::ensure!(failed == 0, "{failed} of {} brand forecasts failed", brands.len());
    Ok(())
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
