//! Server-rendered HTML. The dashboard fetches `/api/forecast/{brand}` on
//! selection; the report page embeds one figure and needs no server.

use super::{error_message, ReportView};
use std::fmt::Write;

const PAGE_TITLE: &str = "PM Demand Forecast";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#222}\
select{font-size:1rem;padding:.25rem}\
#chart{width:100%;height:480px}\
.error{color:#b00020}";

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON embedded in a `<script>` block must not close the tag.
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn head(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<script src=\"{PLOTLY_CDN}\"></script>\n<style>{STYLE}</style>\n</head>\n",
        escape_html(title)
    )
}

const DASHBOARD_SCRIPT: &str = r#"
const select = document.getElementById('brand');
const insights = document.getElementById('insights');
const mape = document.getElementById('mape');
const status = document.getElementById('status');

async function show(brand) {
  status.textContent = '';
  const res = await fetch('/api/forecast/' + encodeURIComponent(brand));
  const body = await res.json();
  if (!res.ok) {
    Plotly.purge('chart');
    insights.replaceChildren();
    mape.textContent = '';
    status.textContent = body.message || body.error;
    return;
  }
  Plotly.react('chart', body.figure.data, body.figure.layout);
  insights.replaceChildren(...body.insights.map(text => {
    const li = document.createElement('li');
    li.textContent = text;
    return li;
  }));
  mape.textContent = body.mape_text;
}

select.addEventListener('change', () => show(select.value));
show(select.value);
"#;

/// Single-page dashboard with one brand selector, the first brand selected.
pub fn dashboard_page(brands: &[&str]) -> String {
    let mut html = head(PAGE_TITLE);
    html.push_str("<body>\n");
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(PAGE_TITLE));
    html.push_str("<label for=\"brand\">Brand</label>\n<select id=\"brand\">\n");
    for brand in brands {
        let b = escape_html(brand);
        let _ = writeln!(html, "<option value=\"{b}\">{b}</option>");
    }
    html.push_str("</select>\n");
    html.push_str("<p id=\"status\" class=\"error\"></p>\n<div id=\"chart\"></div>\n");
    html.push_str("<h2>Insights</h2>\n<ul id=\"insights\"></ul>\n<p id=\"mape\"></p>\n");
    let _ = write!(html, "<script>{DASHBOARD_SCRIPT}</script>\n</body>\n</html>\n");
    html
}

/// Standalone page for one brand with the figure inlined.
pub fn report_page(view: &ReportView) -> Result<String, serde_json::Error> {
    let figure = script_json(&serde_json::to_string(&view.figure)?);
    let mut html = head(&format!("{PAGE_TITLE}: {}", view.brand));
    html.push_str("<body>\n");
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(PAGE_TITLE));
    html.push_str("<div id=\"chart\"></div>\n<h2>Insights</h2>\n<ul>\n");
    for text in &view.insights {
        let _ = writeln!(html, "<li>{}</li>", escape_html(text));
    }
    html.push_str("</ul>\n");
    let _ = writeln!(html, "<p>{}</p>", escape_html(&view.mape_text));
    let _ = write!(
        html,
        "<script>const fig = {figure};\nPlotly.newPlot('chart', fig.data, fig.layout);</script>\n</body>\n</html>\n"
    );
    Ok(html)
}

/// Page shown instead of the chart when a brand cannot be forecast.
pub fn error_page(brand: &str, err: impl std::fmt::Display) -> String {
    let mut html = head(PAGE_TITLE);
    html.push_str("<body>\n");
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(PAGE_TITLE));
    let _ = writeln!(
        html,
        "<p class=\"error\">{}</p>",
        escape_html(&error_message(brand, err))
    );
    html.push_str("</body>\n</html>\n");
    html
}
