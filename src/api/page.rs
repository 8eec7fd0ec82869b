//! HTML page rendering
//!
//! One self-contained page: the upload form, then either the error message
//! or the summary (totals, chart, rows).

use std::fmt::Write as _;

use crate::chart::CHART_TITLE;
use crate::types::{PageState, Record, Summary};

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    let rounded = (n * 1e6).round() / 1e6;
    let text = format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string();
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Render the whole page for a request outcome
pub fn render_page(state: &PageState) -> String {
    let body = match state {
        PageState::AwaitingUpload => String::new(),
        PageState::Error(message) => render_error(message),
        PageState::ResultReady(summary) => render_summary(summary),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Profit Dashboard</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>Profit Dashboard</h1>
        {form}
        {body}
    </div>
</body>
</html>"#,
        css = inline_css(),
        form = render_form(),
        body = body,
    )
}

fn inline_css() -> &'static str {
    "body{font-family:Arial,Helvetica,sans-serif;margin:20px;color:#222;background:#fff;}\
.container{max-width:960px;margin:0 auto;}\
.error{color:#c00000;font-weight:bold;margin:12px 0;}\
.totals{border-collapse:collapse;margin:12px 0;}\
.totals th,.totals td{border:1px solid #ddd;padding:6px 10px;text-align:left;}\
.rows{border-collapse:collapse;width:100%;margin:12px 0;}\
.rows th,.rows td{border:1px solid #ddd;padding:4px 8px;text-align:right;}\
.rows th{background:#f4f4f4;}\
.negative{color:#c00000;}\
figure{margin:16px 0;}\
figure img{max-width:100%;}"
}

fn render_form() -> &'static str {
    r#"<form method="post" action="/" enctype="multipart/form-data">
            <input type="file" name="file" accept=".csv,text/csv">
            <button type="submit">Upload</button>
        </form>"#
}

fn render_error(message: &str) -> String {
    format!(r#"<div class="error">{}</div>"#, html_escape(message))
}

fn amount_cell(value: Option<f64>) -> String {
    match value {
        None => "<td></td>".to_string(),
        Some(v) if v < 0.0 => format!(r#"<td class="negative">{}</td>"#, format_number(v)),
        Some(v) => format!("<td>{}</td>", format_number(v)),
    }
}

fn render_summary(summary: &Summary) -> String {
    let totals = &summary.totals;
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<h2>Summary</h2>
        <table class="totals">
            <tr><th>Total Revenue</th><td>{revenue}</td></tr>
            <tr><th>Total Cost</th><td>{cost}</td></tr>
            <tr><th>Total Profit</th><td>{profit}</td></tr>
            <tr><th>Profit Margin</th><td>{margin:.2}%</td></tr>
        </table>
        <figure>
            <img src="{plot_url}" alt="{title}">
        </figure>"#,
        revenue = format_number(totals.revenue),
        cost = format_number(totals.cost),
        profit = format_number(totals.profit),
        margin = totals.margin,
        plot_url = html_escape(&summary.plot_url),
        title = CHART_TITLE,
    );

    html.push_str(&render_rows(&summary.data, &summary.extra_columns));
    html
}

fn render_rows(rows: &[Record], extra: &[String]) -> String {

    let mut html = String::from(r#"<h2>Data</h2><table class="rows"><tr><th>Date</th><th>Revenue</th><th>Cost</th><th>Profit</th>"#);
    for name in extra {
        let _ = write!(html, "<th>{}</th>", html_escape(name));
    }
    html.push_str("</tr>");

    for row in rows {
        let _ = write!(html, "<tr><td>{}</td>", row.date.format("%Y-%m-%d"));
        html.push_str(&amount_cell(row.revenue));
        html.push_str(&amount_cell(row.cost));
        html.push_str(&amount_cell(row.profit));
        for name in extra {
            let value = row.extra.get(name).map(String::as_str).unwrap_or("");
            let _ = write!(html, "<td>{}</td>", html_escape(value));
        }
        html.push_str("</tr>");
    }

    html.push_str("</table>");
    html
}
