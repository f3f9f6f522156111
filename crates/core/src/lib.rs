pub mod domain;
pub mod forecast;
pub mod ingest;
pub mod insight;
pub mod prep;
pub mod report;
pub mod session;

#[cfg(test)]
pub(crate) mod fixtures;

pub mod config {
    use std::path::PathBuf;

    pub const DEFAULT_DATA_URL: &str =
        "https://raw.githubusercontent.com/sarakadd/SCOPSIS/main/REGIE%20PoC%20Data%20(1).csv";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub data_url: String,
        pub data_path: Option<PathBuf>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> Self {
            Self {
                data_url: std::env::var("DATA_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_DATA_URL.to_string()),
                data_path: std::env::var("DATA_PATH")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
                sentry_dsn: std::env::var("SENTRY_DSN")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
            }
        }
    }
}
