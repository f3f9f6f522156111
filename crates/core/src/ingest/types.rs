use serde::{Deserialize, Serialize};

/// Columns the source CSV must provide. Other columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Date",
    "Daily Sales",
    "Tobacco_Company",
    "Consumable_Brand",
    "USD/LBP Rate",
    "Price",
];

/// One source row, kept as text until the filter stage coerces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSalesRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Daily Sales")]
    pub daily_sales: String,
    #[serde(rename = "Tobacco_Company")]
    pub company: String,
    #[serde(rename = "Consumable_Brand")]
    pub brand: String,
    #[serde(rename = "USD/LBP Rate")]
    pub exchange_rate: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(skip)]
    pub line: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    pub rows: Vec<RawSalesRow>,
}

impl SalesTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
