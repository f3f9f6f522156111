//! Deterministic sample data shared by unit tests.

use crate::domain::sales::{BrandPoint, BrandSeries};
use chrono::{Duration, NaiveDate};

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
}

fn sales_at(t: usize, scale: f64) -> f64 {
    let weekly = [40.0, -25.0, 10.0, 55.0, -30.0, -60.0, 10.0];
    scale * (1000.0 + 0.4 * t as f64 + weekly[t % 7] + 20.0 * (0.37 * t as f64).sin())
}

fn rate_at(t: usize) -> f64 {
    1500.0 + 3.0 * t as f64 + ((t * 13) % 11) as f64 * 4.0
}

fn price_at(t: usize) -> f64 {
    4.0 + 0.002 * t as f64 + ((t * 7) % 5) as f64 * 0.05
}

/// `days` consecutive daily observations with trend, weekly cycle and both
/// covariates present.
pub fn daily_series(brand: &str, days: usize) -> BrandSeries {
    let points = (0..days)
        .map(|t| BrandPoint {
            date: start_date() + Duration::days(t as i64),
            daily_sales: sales_at(t, 1.0),
            exchange_rate: Some(rate_at(t)),
            price: Some(price_at(t)),
        })
        .collect();
    BrandSeries::new(brand, points)
}

/// Source CSV with `days` rows for each brand plus noise rows for another
/// company. Brands listed later sell less.
pub fn sales_csv(brands: &[&str], days: usize) -> String {
    let mut out = String::from("Date,Daily Sales,Tobacco_Company,Consumable_Brand,USD/LBP Rate,Price\n");
    for (b, brand) in brands.iter().enumerate() {
        let scale = 1.0 / (b + 1) as f64;
        for t in 0..days {
            let date = start_date() + Duration::days(t as i64);
            out.push_str(&format!(
                "{},{:.3},PM,{},{:.2},{:.3}\n",
                date.format("%Y-%m-%d"),
                sales_at(t, scale),
                brand,
                rate_at(t),
                price_at(t)
            ));
        }
    }
    out.push_str("2021-01-01,55,JTI,WINSTON,1500,3.2\n");
    out
}
