use crate::config::Settings;
use crate::ingest::error::IngestError;
use crate::ingest::table::parse_sales_csv;
use crate::ingest::types::SalesTable;
use std::path::PathBuf;

#[async_trait::async_trait]
pub trait SalesDataSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Where the data comes from, for logs.
    fn location(&self) -> String;

    async fn fetch_csv(&self) -> Result<String, IngestError>;
}

/// One-shot GET of a CSV resource. No retries; any failure is final.
#[derive(Debug, Clone)]
pub struct HttpCsvSource {
    http: reqwest::Client,
    url: String,
}

impl HttpCsvSource {
    pub fn new(url: impl Into<String>) -> Result<Self, IngestError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("demand_core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(IngestError::Client)?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait::async_trait]
impl SalesDataSource for HttpCsvSource {
    fn source_name(&self) -> &'static str {
        "http_csv"
    }

    fn location(&self) -> String {
        self.url.clone()
    }

    async fn fetch_csv(&self) -> Result<String, IngestError> {
        let fetch_err = |source| IngestError::Fetch {
            url: self.url.clone(),
            source,
        };

        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(fetch_err)?;

        let status = res.status();
        if !status.is_success() {
            return Err(IngestError::Status {
                url: self.url.clone(),
                status,
            });
        }

        res.text().await.map_err(fetch_err)
    }
}

#[derive(Debug, Clone)]
pub struct FileCsvSource {
    path: PathBuf,
}

impl FileCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl SalesDataSource for FileCsvSource {
    fn source_name(&self) -> &'static str {
        "file_csv"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_csv(&self) -> Result<String, IngestError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| IngestError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// A local `DATA_PATH` wins over `DATA_URL`.
pub fn source_from_settings(settings: &Settings) -> Result<Box<dyn SalesDataSource>, IngestError> {
    match &settings.data_path {
        Some(path) => Ok(Box::new(FileCsvSource::new(path.clone()))),
        None => Ok(Box::new(HttpCsvSource::new(settings.data_url.clone())?)),
    }
}

pub async fn load_table(source: &dyn SalesDataSource) -> Result<SalesTable, IngestError> {
    let location = source.location();
    let t0 = std::time::Instant::now();
    let text = source.fetch_csv().await?;
    let table = parse_sales_csv(&text)?;

    tracing::info!(
        source = source.source_name(),
        %location,
        rows = table.len(),
        bytes = text.len(),
        elapsed_ms = t0.elapsed().as_millis(),
        "loaded sales table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "Date,Daily Sales,Tobacco_Company,Consumable_Brand,USD/LBP Rate,Price\n\
                       2023-01-01,10,PM,HEETS,15000,4.0\n";

    #[tokio::test]
    async fn loads_table_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let source = FileCsvSource::new(file.path());
        let table = load_table(&source).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].brand, "HEETS");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileCsvSource::new(dir.path().join("absent.csv"));
        let err = load_table(&source).await.unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }

    #[test]
    fn data_path_overrides_url() {
        let settings = Settings {
            data_url: "https://example.invalid/data.csv".to_string(),
            data_path: Some(PathBuf::from("/tmp/sales.csv")),
            sentry_dsn: None,
        };
        let source = source_from_settings(&settings).unwrap();
        assert_eq!(source.source_name(), "file_csv");
        assert_eq!(source.location(), "/tmp/sales.csv");

        let settings = Settings {
            data_path: None,
            ..settings
        };
        let source = source_from_settings(&settings).unwrap();
        assert_eq!(source.source_name(), "http_csv");
    }

    async fn serve(app: axum::Router) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn loads_table_over_http() {
        let app = axum::Router::new().route("/sales.csv", axum::routing::get(|| async { CSV }));
        let addr = serve(app).await;

        let source = HttpCsvSource::new(format!("http://{addr}/sales.csv")).unwrap();
        let table = load_table(&source).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].company, "PM");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let addr = serve(axum::Router::new()).await;
        let url = format!("http://{addr}/missing.csv");

        let source = HttpCsvSource::new(url.clone()).unwrap();
        match load_table(&source).await.unwrap_err() {
            IngestError::Status { url: got, status } => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(got, url);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_fetch_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpCsvSource::new(format!("http://{addr}/sales.csv")).unwrap();
        let err = load_table(&source).await.unwrap_err();
        assert!(matches!(err, IngestError::Fetch { .. }), "{err:?}");
    }
}
