use std::path::{Path, PathBuf};

use anyhow::Context;
use demand_core::domain::brand::{resolve_brand, BRANDS};
use demand_core::report::{self, ReportView};

/// `--brand` values to canonical brand names, in the order given. No flag
/// means every brand.
pub fn resolve_brands(requested: &[String]) -> anyhow::Result<Vec<&'static str>> {
    if requested.is_empty() {
        return Ok(BRANDS.to_vec());
    }
    let mut out: Vec<&'static str> = Vec::with_capacity(requested.len());
    for name in requested {
        let brand = resolve_brand(name).with_context(|| {
            format!("unknown brand {name:?} (expected one of {})", BRANDS.join(", "))
        })?;
        if !out.contains(&brand) {
            out.push(brand);
        }
    }
    Ok(out)
}

pub fn render_text(view: &ReportView) -> String {
    let mut out = format!("{} ({})\n", view.brand, view.summary.model);
    for text in &view.insights {
        out.push_str("  ");
        out.push_str(text);
        out.push('\n');
    }
    out.push_str("  ");
    out.push_str(&view.mape_text);
    out.push('\n');
    if let (Some(first), Some(last)) = (view.forecast.first(), view.forecast.last()) {
        out.push_str(&format!(
            "  forecast {} .. {}: {:.2} .. {:.2}\n",
            first.date, last.date, first.value, last.value
        ));
    }
    out
}

/// Writes `<dir>/<brand>.html`, creating `dir` if needed.
pub fn write_report_page(dir: &Path, view: &ReportView) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(format!("{}.html", view.brand));
    let html = report::report_page(view).context("render report page")?;
    std::fs::write(&path, html).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use demand_core::session::ForecastSession;

    fn view(brand: &str) -> ReportView {
        let start = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
        let weekly = [30.0, -20.0, 5.0, 45.0, -25.0, -50.0, 15.0];
        let mut csv =
            String::from("Date,Daily Sales,Tobacco_Company,Consumable_Brand,USD/LBP Rate,Price\n");
        for t in 0..380usize {
            let sales = 700.0 + 0.25 * t as f64 + weekly[t % 7] + 12.0 * (0.29 * t as f64).sin();
            let rate = 1500.0 + 2.5 * t as f64 + ((t * 13) % 11) as f64 * 3.0;
            let price = 3.5 + 0.001 * t as f64 + ((t * 7) % 5) as f64 * 0.03;
            csv.push_str(&format!(
                "{},{sales:.3},PM,{brand},{rate:.2},{price:.3}\n",
                (start + Duration::days(t as i64)).format("%Y-%m-%d")
            ));
        }
        let table = demand_core::ingest::parse_sales_csv(&csv).unwrap();
        let report = ForecastSession::new(&table).unwrap().run(brand).unwrap();
        ReportView::from(&report)
    }

    #[test]
    fn no_brand_flag_means_all() {
        assert_eq!(resolve_brands(&[]).unwrap(), BRANDS.to_vec());
    }

    #[test]
    fn brands_are_canonicalised_and_deduplicated() {
        let requested = vec!["heets".to_string(), " BOND ".to_string(), "HEETS".to_string()];
        assert_eq!(resolve_brands(&requested).unwrap(), vec!["HEETS", "BOND"]);
    }

    #[test]
    fn unknown_brand_is_rejected() {
        let err = resolve_brands(&["CAMEL".to_string()]).unwrap_err();
        assert!(err.to_string().contains("CAMEL"));
    }

    #[test]
    fn writes_html_report() {
        let view = view("CHESTERFIELD");
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("reports");
        let path = write_report_page(&target, &view).unwrap();
        assert_eq!(path, target.join("CHESTERFIELD.html"));
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("Sales Forecast for CHESTERFIELD"));
    }

    #[test]
    fn text_summary_has_mape_line() {
        let text = render_text(&view("MARLBORO"));
        assert!(text.starts_with("MARLBORO (SARIMAX(1,1,1)(1,1,1,7))\n"));
        assert!(text.contains("Mean Absolute Percentage Error for MARLBORO: "));
        assert!(text.contains("forecast 2023-03-16 .. "));
    }
}
