//! Declarative plot description assembled fresh on every render pass.

use serde::{Deserialize, Serialize};

use super::decode::Row;
use super::style::SeriesStyle;

pub const FIGURE_MIN: f64 = 5.0;
pub const FIGURE_MAX: f64 = 20.0;
pub const DEFAULT_FIGURE_WIDTH: f64 = 12.0;
pub const DEFAULT_FIGURE_HEIGHT: f64 = 6.0;

pub const DEFAULT_TITLE: &str = "Gradient Norm vs Learning Steps";
pub const DEFAULT_X_LABEL: &str = "Learning Steps (Iterations)";
pub const DEFAULT_Y_LABEL: &str = "Gradient Norm";

/// Font request for one text role on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
}

impl FontSpec {
    pub fn sans(size: f64) -> Self {
        Self {
            family: "sans-serif".to_string(),
            size,
        }
    }
}

/// Axis limits. Each bound is independently optional; an absent bound leaves
/// that side of the axis to auto-scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
}

impl AxisBounds {
    pub fn is_auto(&self) -> bool {
        self.x_min.is_none() && self.x_max.is_none() && self.y_min.is_none() && self.y_max.is_none()
    }
}

/// Chart-wide options mapped straight off the global controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub title_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    pub grid: bool,
    pub bounds: AxisBounds,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_FIGURE_WIDTH,
            height: DEFAULT_FIGURE_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            x_label: DEFAULT_X_LABEL.to_string(),
            y_label: DEFAULT_Y_LABEL.to_string(),
            title_size: 16.0,
            label_size: 12.0,
            tick_size: 10.0,
            grid: true,
            bounds: AxisBounds::default(),
        }
    }
}

impl PlotOptions {
    /// Clamp the figure dimensions into the slider range.
    pub fn sanitized(mut self) -> Self {
        self.width = self.width.clamp(FIGURE_MIN, FIGURE_MAX);
        self.height = self.height.clamp(FIGURE_MIN, FIGURE_MAX);
        self
    }
}

/// One curve: its rows in file order plus the resolved style.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub name: String,
    pub rows: Vec<Row>,
    pub style: SeriesStyle,
}

/// The full declarative chart description handed to the renderer. Built
/// fresh each render and consumed once; never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub title_font: FontSpec,
    pub label_font: FontSpec,
    pub tick_font: FontSpec,
    pub bounds: AxisBounds,
    pub grid: bool,
    pub series: Vec<PlotSeries>,
}

impl PlotSpec {
    /// Legend entries, one per series, in series order.
    pub fn legend(&self) -> Vec<&str> {
        self.series
            .iter()
            .map(|series| series.style.label.as_str())
            .collect()
    }
}

/// Assemble the chart description. Deterministic: identical inputs produce
/// an identical spec, series stay in upload order, and the legend carries
/// exactly one entry per series in that order.
pub fn compose(series: Vec<PlotSeries>, options: &PlotOptions) -> PlotSpec {
    let options = options.clone().sanitized();
    PlotSpec {
        width: options.width,
        height: options.height,
        title: options.title,
        x_label: options.x_label,
        y_label: options.y_label,
        title_font: FontSpec::sans(options.title_size),
        label_font: FontSpec::sans(options.label_size),
        tick_font: FontSpec::sans(options.tick_size),
        bounds: options.bounds,
        grid: options.grid,
        series,
    }
}
