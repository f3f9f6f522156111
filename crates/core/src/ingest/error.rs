use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to build sales data http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to fetch sales data from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("sales data request to {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read sales data from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sales data is missing required column {0:?}")]
    MissingColumn(&'static str),

    #[error("malformed sales CSV at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },
}
