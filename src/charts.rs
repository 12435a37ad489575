//! Four-panel dashboard rendering.
//!
//! One 1800×1200 PNG, split 2×2:
//! - boxplot of every ticker's closing-price distribution
//! - scatter of the first highlighted ticker's closes against calendar date
//! - scatter of the second highlighted ticker, in a distinct color
//! - overlaid per-ticker histogram of closes, 30 bins, with a legend
//!
//! The table keeps dates as strings; they are parsed into `NaiveDate` here
//! and nowhere else. Which tickers get the two scatter panels is a parameter,
//! not a hardcoded symbol pair.

use crate::table::{PriceTable, TableError};
use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const CANVAS_WIDTH: u32 = 1800;
const CANVAS_HEIGHT: u32 = 1200;
const HISTOGRAM_BINS: usize = 30;
/// Point/bar transparency shared by the scatter and histogram panels.
const ALPHA: f64 = 0.7;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 28);
const AXIS_FONT: (&str, u32) = ("sans-serif", 18);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("highlight ticker '{0}' is not in the table")]
    UnknownTicker(String),

    #[error("cannot parse date '{0}' (expected YYYY-MM-DD)")]
    DateParse(String),

    #[error("no finite closing prices to plot for '{0}'")]
    NoData(String),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("drawing error: {0}")]
    Draw(String),
}

fn draw_err(e: impl std::fmt::Display) -> ChartError {
    ChartError::Draw(e.to_string())
}

/// Render the dashboard for `table` into a PNG at `output`.
///
/// `highlight` names the two tickers given dedicated scatter panels; both
/// must be columns of the table. Overwrites `output` if it exists.
pub fn render_dashboard(
    table: &PriceTable,
    highlight: &[String; 2],
    output: &Path,
) -> Result<(), ChartError> {
    for ticker in highlight {
        if !table.tickers().iter().any(|t| t == ticker) {
            return Err(ChartError::UnknownTicker(ticker.clone()));
        }
    }

    let dates = parse_dates(table)?;

    let root = BitMapBackend::new(output, (CANVAS_WIDTH, CANVAS_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let panels = root.split_evenly((2, 2));
    draw_boxplot(&panels[0], table)?;
    draw_scatter(&panels[1], table, &highlight[0], &dates, BLUE)?;
    draw_scatter(&panels[2], table, &highlight[1], &dates, GREEN)?;
    draw_histogram(&panels[3], table)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

/// Parse the table's string date axis. A row that does not parse is fatal:
/// the scatter panels have nothing sensible to plot it at.
fn parse_dates(table: &PriceTable) -> Result<Vec<NaiveDate>, ChartError> {
    table
        .dates()?
        .into_iter()
        .map(|d| {
            NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|_| ChartError::DateParse(d))
        })
        .collect()
}

fn draw_boxplot<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &PriceTable,
) -> Result<(), ChartError> {
    let labels: Vec<&str> = table.tickers().iter().map(|s| s.as_str()).collect();

    let mut per_ticker: Vec<Vec<f64>> = Vec::with_capacity(labels.len());
    for ticker in table.tickers() {
        let values = finite_closes(table, ticker)?;
        per_ticker.push(values);
    }

    let (y_min, y_max) = padded_range(per_ticker.iter().flatten().copied());

    let mut chart = ChartBuilder::on(area)
        .caption("Boxplot of Bank Stock Prices (5Y Lookback)", CAPTION_FONT)
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(labels[..].into_segmented(), y_min as f32..y_max as f32)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Bank")
        .y_desc("Stock Prices")
        .axis_desc_style(AXIS_FONT)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(s) => s.to_string(),
            _ => String::new(),
        })
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(labels.iter().zip(per_ticker.iter()).map(|(label, values)| {
            Boxplot::new_vertical(SegmentValue::CenterOf(label), &Quartiles::new(values))
        }))
        .map_err(draw_err)?;

    Ok(())
}

fn draw_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &PriceTable,
    ticker: &str,
    dates: &[NaiveDate],
    color: RGBColor,
) -> Result<(), ChartError> {
    let closes = table.closes(ticker)?;
    let points: Vec<(NaiveDate, f64)> = dates
        .iter()
        .copied()
        .zip(closes)
        .filter(|(_, close)| close.is_finite())
        .collect();

    if points.is_empty() {
        return Err(ChartError::NoData(ticker.to_string()));
    }

    let mut x_min = points.iter().map(|(d, _)| *d).min().unwrap_or_default();
    let mut x_max = points.iter().map(|(d, _)| *d).max().unwrap_or_default();
    if x_min == x_max {
        // Degenerate single-day axis
        x_min = x_min - chrono::Duration::days(1);
        x_max = x_max + chrono::Duration::days(1);
    }
    let (y_min, y_max) = padded_range(points.iter().map(|(_, v)| *v));

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{ticker} Stock Price (5Y Lookback)"), CAPTION_FONT)
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Stock Price")
        .axis_desc_style(AXIS_FONT)
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(date, close)| Circle::new((date, close), 3, color.mix(ALPHA).filled())),
        )
        .map_err(draw_err)?;

    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &PriceTable,
) -> Result<(), ChartError> {
    let mut per_ticker: Vec<(String, Vec<f64>)> = Vec::with_capacity(table.tickers().len());
    for ticker in table.tickers() {
        per_ticker.push((ticker.clone(), finite_closes(table, ticker)?));
    }

    // Bins span the pooled range of every ticker so the series overlay
    // on one shared x axis.
    let all = per_ticker.iter().flat_map(|(_, v)| v.iter().copied());
    let (mut x_min, mut x_max) = min_max(all);
    if x_min == x_max {
        x_max = x_min + 1.0;
    }
    let bin_width = (x_max - x_min) / HISTOGRAM_BINS as f64;

    let counted: Vec<(String, Vec<u32>)> = per_ticker
        .iter()
        .map(|(sym, values)| (sym.clone(), bin_counts(values, x_min, bin_width)))
        .collect();

    let tallest = counted
        .iter()
        .flat_map(|(_, counts)| counts.iter().copied())
        .max()
        .unwrap_or(1)
        .max(1);
    let y_max = tallest as f64 * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(
            "Histogram of Daily Closing Stock Prices (5Y Lookback)",
            CAPTION_FONT,
        )
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc("Stock Prices")
        .y_desc("Observations")
        .axis_desc_style(AXIS_FONT)
        .draw()
        .map_err(draw_err)?;

    for (idx, (sym, counts)) in counted.iter().enumerate() {
        let color = Palette99::pick(idx).mix(ALPHA);
        chart
            .draw_series(counts.iter().enumerate().filter(|(_, c)| **c > 0).map(
                |(bin, count)| {
                    let x0 = x_min + bin as f64 * bin_width;
                    Rectangle::new([(x0, 0.0), (x0 + bin_width, *count as f64)], color.filled())
                },
            ))
            .map_err(draw_err)?
            .label(sym)
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(draw_err)?;

    Ok(())
}

fn finite_closes(table: &PriceTable, ticker: &str) -> Result<Vec<f64>, ChartError> {
    let values: Vec<f64> = table
        .closes(ticker)?
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return Err(ChartError::NoData(ticker.to_string()));
    }
    Ok(values)
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Value range padded by 5% on each side so points sit inside the frame.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = min_max(values);
    let span = (hi - lo).max(1e-9);
    (lo - span * 0.05, hi + span * 0.05)
}

fn bin_counts(values: &[f64], x_min: f64, bin_width: f64) -> Vec<u32> {
    let mut counts = vec![0u32; HISTOGRAM_BINS];
    for &v in values {
        let bin = ((v - x_min) / bin_width) as usize;
        counts[bin.min(HISTOGRAM_BINS - 1)] += 1;
    }
    counts
}
