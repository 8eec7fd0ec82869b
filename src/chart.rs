//! Revenue and Profit chart rendering
//!
//! Draws both series against the shared date axis into an in-memory RGB
//! buffer, encodes it as PNG and wraps it in a data URI for inline `<img>`.
//! Text is rasterized with a font embedded in the binary, so rendering does
//! not depend on fonts installed on the host.

use std::io::Cursor;
use std::ops::Range;
use std::sync::OnceLock;

use base64::Engine as _;
use chrono::{Days, NaiveDate};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use crate::error::{ProfitError, ProfitResult};
use crate::types::Table;

pub const CHART_TITLE: &str = "Revenue and Profit Over Time";
pub const X_AXIS_TITLE: &str = "Date";
pub const Y_AXIS_TITLE: &str = "Amount";

const REVENUE_COLOR: RGBColor = RGBColor(99, 110, 250);
const PROFIT_COLOR: RGBColor = RGBColor(239, 85, 59);
const MARKER_SIZE: u32 = 4;

const FONT_FAMILY: &str = "sans-serif";
const FONT_BYTES: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Register the embedded font under the family every chart style uses
fn ensure_font() -> ProfitResult<()> {
    let ready = *FONT_READY
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if ready {
        Ok(())
    } else {
        Err(ProfitError::Render(
            "embedded chart font could not be loaded".to_string(),
        ))
    }
}

/// Output image size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 700,
            height: 500,
        }
    }
}

fn render_error<E: std::fmt::Display>(e: E) -> ProfitError {
    ProfitError::Render(e.to_string())
}

/// Pad a range so plotters never sees an empty span
fn padded(min: f64, max: f64) -> Range<f64> {
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Day offset from the earliest date, so the x axis is plain f64
fn day_offset(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

fn axis_label(origin: NaiveDate, offset: f64) -> String {
    let days = offset.round();
    if days < 0.0 {
        return String::new();
    }
    origin
        .checked_add_days(Days::new(days as u64))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Runs of consecutive present points; a missing value breaks the line
fn segments(points: &[Option<(f64, f64)>]) -> Vec<Vec<(f64, f64)>> {
    points
        .split(|p| p.is_none())
        .filter(|run| !run.is_empty())
        .map(|run| run.iter().flatten().copied().collect())
        .collect()
}

/// Render the two-series line+marker chart as PNG bytes
pub fn render_png(table: &Table, options: &ChartOptions) -> ProfitResult<Vec<u8>> {
    let (width, height) = (options.width, options.height);
    if width == 0 || height == 0 {
        return Err(ProfitError::Render(format!(
            "invalid chart size {}x{}",
            width, height
        )));
    }
    ensure_font()?;

    let origin = table
        .rows
        .iter()
        .map(|r| r.date)
        .min()
        .unwrap_or_default();

    let revenue: Vec<Option<(f64, f64)>> = table
        .rows
        .iter()
        .map(|r| r.revenue.map(|v| (day_offset(origin, r.date), v)))
        .collect();
    let profit: Vec<Option<(f64, f64)>> = table
        .rows
        .iter()
        .map(|r| r.profit.map(|v| (day_offset(origin, r.date), v)))
        .collect();

    let x_max = table
        .rows
        .iter()
        .map(|r| day_offset(origin, r.date))
        .fold(0.0, f64::max);
    let (y_min, y_max) = revenue
        .iter()
        .chain(profit.iter())
        .flatten()
        .map(|p| p.1)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

    let x_range = if table.is_empty() { 0.0..1.0 } else { padded(0.0, x_max) };
    let y_range = padded(y_min, y_max);

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(CHART_TITLE, (FONT_FAMILY, 22))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc(X_AXIS_TITLE)
            .y_desc(Y_AXIS_TITLE)
            .x_labels(6)
            .y_labels(6)
            .x_label_formatter(&|x| axis_label(origin, *x))
            .draw()
            .map_err(render_error)?;

        for (name, points, color) in [
            ("Revenue", &revenue, REVENUE_COLOR),
            ("Profit", &profit, PROFIT_COLOR),
        ] {
            for run in segments(points) {
                chart
                    .draw_series(LineSeries::new(run, color.stroke_width(2)))
                    .map_err(render_error)?;
            }

            chart
                .draw_series(
                    points
                        .iter()
                        .flatten()
                        .map(|&p| Circle::new(p, MARKER_SIZE, color.filled())),
                )
                .map_err(render_error)?
                .label(name)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .configure_series_labels()
            .label_font((FONT_FAMILY, 14))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    let frame = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ProfitError::Render("chart buffer size mismatch".to_string()))?;

    let mut png = Vec::new();
    frame
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(render_error)?;

    Ok(png)
}

/// Wrap PNG bytes for inline embedding
pub fn to_data_uri(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

/// Render and encode in one step
pub fn render_data_uri(table: &Table, options: &ChartOptions) -> ProfitResult<String> {
    render_png(table, options).map(|png| to_data_uri(&png))
}
