//! Plotly figure for the actual-vs-forecast chart. Serialises to the
//! `{data, layout}` object `Plotly.newPlot` accepts.

use chrono::NaiveDate;
use serde::Serialize;

const ACTUAL_COLOR: &str = "#0062A3";
const FORECAST_COLOR: &str = "#1CFB05";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub mode: &'static str,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: &'static str,
    pub width: u32,
    pub shape: &'static str,
    pub smoothing: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub legend: Legend,
    pub plot_bgcolor: &'static str,
    pub margin: Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub showgrid: bool,
    pub showticklabels: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtick: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
    pub bgcolor: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

fn trace(name: &str, dates: &[NaiveDate], values: Vec<f64>, color: &'static str, dash: Option<&'static str>) -> Trace {
    Trace {
        kind: "scatter",
        name: name.to_string(),
        mode: "lines+markers",
        x: dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect(),
        y: values,
        line: Line {
            color,
            width: 2,
            shape: "spline",
            smoothing: 0.5,
            dash,
        },
    }
}

pub fn forecast_figure(
    brand: &str,
    history_dates: &[NaiveDate],
    history: Vec<f64>,
    forecast_dates: &[NaiveDate],
    forecast: Vec<f64>,
) -> Figure {
    Figure {
        data: vec![
            trace("Actual Sales", history_dates, history, ACTUAL_COLOR, None),
            trace("Forecast", forecast_dates, forecast, FORECAST_COLOR, Some("dot")),
        ],
        layout: Layout {
            title: Title {
                text: format!("Sales Forecast for {brand}"),
            },
            xaxis: Axis {
                showgrid: false,
                showticklabels: true,
                tickformat: Some("%Y"),
                dtick: Some("M12"),
            },
            yaxis: Axis {
                showgrid: false,
                showticklabels: false,
                tickformat: None,
                dtick: None,
            },
            legend: Legend {
                x: 1.0,
                y: 1.0,
                bgcolor: "rgba(255,255,255,0.5)",
            },
            plot_bgcolor: "white",
            margin: Margin {
                l: 50,
                r: 50,
                t: 50,
                b: 50,
            },
        },
    }
}
