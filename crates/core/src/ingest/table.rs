use crate::ingest::error::IngestError;
use crate::ingest::types::{RawSalesRow, SalesTable, REQUIRED_COLUMNS};

/// Parses the sales CSV, checking that every required column is present.
pub fn parse_sales_csv(text: &str) -> Result<SalesTable, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| IngestError::Csv { line: 1, source })?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(IngestError::MissingColumn(column));
        }
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<RawSalesRow>().enumerate() {
        // records start on the line after the header
        let line = idx as u64 + 2;
        let mut row = result.map_err(|source| IngestError::Csv { line, source })?;
        row.line = line;
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), columns = headers.len(), "parsed sales csv");
    Ok(SalesTable { rows })
}
