pub mod error;
pub mod provider;
pub mod table;
pub mod types;

pub use error::IngestError;
pub use provider::{load_table, source_from_settings, FileCsvSource, HttpCsvSource, SalesDataSource};
pub use table::parse_sales_csv;
pub use types::{RawSalesRow, SalesTable};
