use crate::domain::sales::BrandSeries;
use serde::{Deserialize, Serialize};

/// Observations compared against the all-time mean.
pub const TRAILING_WINDOW: usize = 30;

const HORIZON_SENTENCE: &str = "The forecast for the next year shows potential growth in sales.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    UpwardTrend,
    Stable,
    Horizon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
}

pub fn generate_insights(series: &BrandSeries) -> Vec<Insight> {
    let brand = &series.brand;
    let upward = match (series.trailing_mean_sales(TRAILING_WINDOW), series.mean_sales()) {
        (Some(recent), Some(overall)) => recent > overall,
        _ => false,
    };

    let trend = if upward {
        Insight {
            kind: InsightKind::UpwardTrend,
            text: format!("The sales for {brand} have shown an upward trend in the last 30 days."),
        }
    } else {
        Insight {
            kind: InsightKind::Stable,
            text: format!("The sales for {brand} have been relatively stable in the last 30 days."),
        }
    };

    vec![
        trend,
        Insight {
            kind: InsightKind::Horizon,
            text: HORIZON_SENTENCE.to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sales::BrandPoint;
    use chrono::{Duration, NaiveDate};

    fn series(brand: &str, sales: &[f64]) -> BrandSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let points = sales
            .iter()
            .enumerate()
            .map(|(i, s)| BrandPoint {
                date: start + Duration::days(i as i64),
                daily_sales: *s,
                exchange_rate: Some(1.0),
                price: Some(1.0),
            })
            .collect();
        BrandSeries::new(brand, points)
    }

    #[test]
    fn rising_recent_sales_are_an_upward_trend() {
        let mut sales = vec![10.0; 60];
        sales.extend(vec![20.0; 30]);
        let insights = generate_insights(&series("HEETS", &sales));
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].kind, InsightKind::UpwardTrend);
        assert_eq!(
            insights[0].text,
            "The sales for HEETS have shown an upward trend in the last 30 days."
        );
        assert_eq!(insights[1].kind, InsightKind::Horizon);
    }

    #[test]
    fn flat_or_falling_sales_are_stable() {
        let insights = generate_insights(&series("BOND", &[5.0; 90]));
        assert_eq!(insights[0].kind, InsightKind::Stable);
        assert!(insights[0].text.contains("BOND"));

        let mut sales = vec![20.0; 60];
        sales.extend(vec![10.0; 30]);
        let insights = generate_insights(&series("BOND", &sales));
        assert_eq!(insights[0].kind, InsightKind::Stable);
    }

    #[test]
    fn short_series_compares_whole_history_with_itself() {
        let insights = generate_insights(&series("FIIT", &[1.0, 2.0, 3.0]));
        assert_eq!(insights[0].kind, InsightKind::Stable);
    }

    #[test]
    fn always_ends_with_horizon_sentence() {
        let insights = generate_insights(&series("MERIT", &[]));
        assert_eq!(insights.last().unwrap().text, HORIZON_SENTENCE);
    }
}
