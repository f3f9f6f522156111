//! Filter & clean stage: turns raw source rows into per-brand series.

use crate::domain::sales::{BrandPoint, BrandSeries, SalesRecord};
use crate::ingest::types::{RawSalesRow, SalesTable};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use thiserror::Error;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const MISSING_MARKERS: [&str; 5] = ["", "nan", "na", "n/a", "null"];

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("unparseable date {value:?} at line {line}")]
    InvalidDate { line: u64, value: String },

    #[error("unparseable {column} value {value:?} at line {line}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// Keeps rows of `company` whose brand is in `brands` and coerces their
/// fields. Fails on the first unparseable date or number among kept rows.
pub fn filter_records(
    table: &SalesTable,
    company: &str,
    brands: &[&str],
) -> Result<Vec<SalesRecord>, PrepError> {
    let mut out = Vec::new();
    for row in &table.rows {
        let row_company = row.company.trim();
        let row_brand = row.brand.trim();
        if row_company != company || !brands.contains(&row_brand) {
            continue;
        }
        out.push(coerce_row(row)?);
    }

    tracing::debug!(
        company,
        kept = out.len(),
        total = table.len(),
        "filtered sales rows"
    );
    Ok(out)
}

fn coerce_row(row: &RawSalesRow) -> Result<SalesRecord, PrepError> {
    Ok(SalesRecord {
        date: parse_date(&row.date).ok_or_else(|| PrepError::InvalidDate {
            line: row.line,
            value: row.date.clone(),
        })?,
        daily_sales: parse_number(&row.daily_sales, "Daily Sales", row.line)?,
        exchange_rate: parse_number(&row.exchange_rate, "USD/LBP Rate", row.line)?,
        price: parse_number(&row.price, "Price", row.line)?,
        company: row.company.trim().to_string(),
        brand: row.brand.trim().to_string(),
        line: row.line,
    })
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_number(raw: &str, column: &'static str, line: u64) -> Result<Option<f64>, PrepError> {
    let raw = raw.trim();
    if MISSING_MARKERS.iter().any(|m| raw.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(PrepError::InvalidNumber {
            line,
            column,
            value: raw.to_string(),
        }),
    }
}

/// Builds the cleaned series for one brand:
/// 1. drop rows with zero or missing sales
/// 2. order by date, keeping the last row (in file order) for a repeated date
/// 3. forward-fill the exchange rate
/// 4. fill the price with the brand's mean observed price
pub fn clean_brand(records: &[SalesRecord], brand: &str) -> BrandSeries {
    let mut rows: Vec<&SalesRecord> = records
        .iter()
        .filter(|r| r.brand == brand)
        .filter(|r| matches!(r.daily_sales, Some(v) if v != 0.0))
        .collect();

    // Stable: rows sharing a date stay in file order.
    rows.sort_by_key(|r| r.date);

    let mut points: Vec<BrandPoint> = Vec::with_capacity(rows.len());
    let mut duplicates = 0usize;
    for r in rows {
        let point = BrandPoint {
            date: r.date,
            daily_sales: r.daily_sales.unwrap_or_default(),
            exchange_rate: r.exchange_rate,
            price: r.price,
        };
        match points.last_mut() {
            Some(last) if last.date == point.date => {
                *last = point;
                duplicates += 1;
            }
            _ => points.push(point),
        }
    }

    let mut carried: Option<f64> = None;
    for p in &mut points {
        match p.exchange_rate {
            Some(v) => carried = Some(v),
            None => p.exchange_rate = carried,
        }
    }

    let observed: Vec<f64> = points.iter().filter_map(|p| p.price).collect();
    if !observed.is_empty() {
        let mean_price = observed.iter().sum::<f64>() / observed.len() as f64;
        for p in points.iter_mut().filter(|p| p.price.is_none()) {
            p.price = Some(mean_price);
        }
    }

    let series = BrandSeries::new(brand, points);
    if duplicates > 0 {
        tracing::warn!(brand, duplicates, "duplicate dates collapsed to the last row");
    }
    tracing::debug!(
        brand,
        points = series.len(),
        missing_covariates = series.missing_covariates(),
        "cleaned brand series"
    );
    series
}

/// Runs the whole stage: one series per allow-listed brand, empty when the
/// brand has no usable rows.
pub fn prepare(
    table: &SalesTable,
    company: &str,
    brands: &[&str],
) -> Result<BTreeMap<String, BrandSeries>, PrepError> {
    let records = filter_records(table, company, brands)?;
    Ok(brands
        .iter()
        .map(|brand| (brand.to_string(), clean_brand(&records, brand)))
        .collect())
}
