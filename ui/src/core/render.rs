//! SVG chart composer.
//!
//! Turns a `PlotSpec` into standalone SVG markup: figure background, title,
//! axis lines and tick labels, optional grid, one polyline per series with
//! its resolved stroke/dash/width, and a legend box carrying exactly one
//! entry per series in series order. The same markup backs the in-app
//! preview and the SVG download, so what the user sees is what exports.

use std::fmt::Write as _;

use super::plot::{PlotSpec, PlotSeries};

/// Figure units are the original tool's 5–20 "figure size" scale; ×100
/// converts to pixels (a 12×6 figure renders at 1200×600).
pub const PX_PER_UNIT: f64 = 100.0;

pub(crate) const MARGIN_LEFT: f64 = 70.0;
pub(crate) const MARGIN_RIGHT: f64 = 24.0;
pub(crate) const MARGIN_TOP: f64 = 48.0;
pub(crate) const MARGIN_BOTTOM: f64 = 58.0;

/// Auto-fit padding applied to data spans.
const PADDING_FRAC: f64 = 0.05;
const MIN_PADDING: f64 = 1e-6;

pub fn pixel_size(spec: &PlotSpec) -> (f64, f64) {
    (spec.width * PX_PER_UNIT, spec.height * PX_PER_UNIT)
}

/// Render the chart to SVG markup.
pub fn render_svg(spec: &PlotSpec) -> String {
    let (width, height) = pixel_size(spec);
    let plot_left = MARGIN_LEFT;
    let plot_right = width - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let plot_bottom = height - MARGIN_BOTTOM;

    let ((x_min, x_max), (y_min, y_max)) = resolve_axes(spec);
    let to_px = |x: f64, y: f64| -> (f64, f64) {
        let px = plot_left + (x - x_min) / (x_max - x_min) * (plot_right - plot_left);
        let py = plot_bottom - (y - y_min) / (y_max - y_min) * (plot_bottom - plot_top);
        (px, py)
    };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}">"##
    );
    let _ = writeln!(
        svg,
        r##"  <rect width="{width:.0}" height="{height:.0}" fill="#ffffff"/>"##
    );

    // Title, centered over the plot area.
    if !spec.title.is_empty() {
        let _ = writeln!(
            svg,
            r##"  <text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-family="{family}" font-size="{size}" fill="#1a1a1a">{title}</text>"##,
            x = (plot_left + plot_right) / 2.0,
            y = MARGIN_TOP - 18.0,
            family = escape_xml(&spec.title_font.family),
            size = spec.title_font.size,
            title = escape_xml(&spec.title),
        );
    }

    let x_ticks = nice_ticks(x_min, x_max, 6);
    let y_ticks = nice_ticks(y_min, y_max, 5);

    // Grid sits under the data.
    if spec.grid {
        for &tick in &x_ticks {
            let (px, _) = to_px(tick, y_min);
            let _ = writeln!(
                svg,
                r##"  <line x1="{px:.1}" y1="{plot_top:.1}" x2="{px:.1}" y2="{plot_bottom:.1}" stroke="#d9d9d9" stroke-width="1"/>"##
            );
        }
        for &tick in &y_ticks {
            let (_, py) = to_px(x_min, tick);
            let _ = writeln!(
                svg,
                r##"  <line x1="{plot_left:.1}" y1="{py:.1}" x2="{plot_right:.1}" y2="{py:.1}" stroke="#d9d9d9" stroke-width="1"/>"##
            );
        }
    }

    // Axis lines.
    let _ = writeln!(
        svg,
        r##"  <line x1="{plot_left:.1}" y1="{plot_bottom:.1}" x2="{plot_right:.1}" y2="{plot_bottom:.1}" stroke="#333333" stroke-width="1"/>"##
    );
    let _ = writeln!(
        svg,
        r##"  <line x1="{plot_left:.1}" y1="{plot_top:.1}" x2="{plot_left:.1}" y2="{plot_bottom:.1}" stroke="#333333" stroke-width="1"/>"##
    );

    // Ticks and tick labels.
    let tick_family = escape_xml(&spec.tick_font.family);
    let tick_size = spec.tick_font.size;
    for &tick in &x_ticks {
        let (px, _) = to_px(tick, y_min);
        let _ = writeln!(
            svg,
            r##"  <line x1="{px:.1}" y1="{plot_bottom:.1}" x2="{px:.1}" y2="{y2:.1}" stroke="#333333" stroke-width="1"/>"##,
            y2 = plot_bottom + 5.0,
        );
        let _ = writeln!(
            svg,
            r##"  <text x="{px:.1}" y="{y:.1}" text-anchor="middle" font-family="{tick_family}" font-size="{tick_size}" fill="#333333">{label}</text>"##,
            y = plot_bottom + 7.0 + tick_size,
            label = format_tick(tick),
        );
    }
    for &tick in &y_ticks {
        let (_, py) = to_px(x_min, tick);
        let _ = writeln!(
            svg,
            r##"  <line x1="{x1:.1}" y1="{py:.1}" x2="{plot_left:.1}" y2="{py:.1}" stroke="#333333" stroke-width="1"/>"##,
            x1 = plot_left - 5.0,
        );
        let _ = writeln!(
            svg,
            r##"  <text x="{x:.1}" y="{y:.1}" text-anchor="end" font-family="{tick_family}" font-size="{tick_size}" fill="#333333">{label}</text>"##,
            x = plot_left - 8.0,
            y = py + tick_size * 0.35,
            label = format_tick(tick),
        );
    }

    // Axis labels.
    let label_family = escape_xml(&spec.label_font.family);
    let label_size = spec.label_font.size;
    if !spec.x_label.is_empty() {
        let _ = writeln!(
            svg,
            r##"  <text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-family="{label_family}" font-size="{label_size}" fill="#1a1a1a">{label}</text>"##,
            x = (plot_left + plot_right) / 2.0,
            y = height - 14.0,
            label = escape_xml(&spec.x_label),
        );
    }
    if !spec.y_label.is_empty() {
        let cy = (plot_top + plot_bottom) / 2.0;
        let _ = writeln!(
            svg,
            r##"  <text x="18" y="{cy:.1}" text-anchor="middle" font-family="{label_family}" font-size="{label_size}" fill="#1a1a1a" transform="rotate(-90 18 {cy:.1})">{label}</text>"##,
            label = escape_xml(&spec.y_label),
        );
    }

    // Data curves, clipped to the plot area, one polyline per series.
    let _ = writeln!(
        svg,
        r##"  <clipPath id="plot-area"><rect x="{plot_left:.1}" y="{plot_top:.1}" width="{w:.1}" height="{h:.1}"/></clipPath>"##,
        w = plot_right - plot_left,
        h = plot_bottom - plot_top,
    );
    for series in &spec.series {
        let points = series
            .rows
            .iter()
            .map(|row| {
                let (px, py) = to_px(row.iteration, row.gradient_norm);
                format!("{px:.2},{py:.2}")
            })
            .collect::<Vec<_>>()
            .join(" ");
        let dash = series
            .style
            .line_style
            .dash_array()
            .map(|pattern| format!(r##" stroke-dasharray="{pattern}""##))
            .unwrap_or_default();
        let _ = writeln!(
            svg,
            r##"  <polyline points="{points}" fill="none" stroke="{color}" stroke-width="{width}"{dash} clip-path="url(#plot-area)"/>"##,
            color = escape_xml(&series.style.color),
            width = series.style.line_width,
        );
    }

    if !spec.series.is_empty() {
        render_legend(&mut svg, spec, plot_right, plot_top);
    }

    svg.push_str("</svg>\n");
    svg
}

/// Legend box in the top-right corner of the plot area: a line sample plus
/// the series label, one row per series, in series order.
fn render_legend(svg: &mut String, spec: &PlotSpec, plot_right: f64, plot_top: f64) {
    let entry_h = spec.tick_font.size + 8.0;
    let sample_w = 26.0;
    let box_w = sample_w
        + 14.0
        + spec
            .series
            .iter()
            .map(|series| series.style.label.chars().count())
            .max()
            .unwrap_or(0) as f64
            * spec.tick_font.size
            * 0.62;
    let box_h = entry_h * spec.series.len() as f64 + 10.0;
    let box_x = plot_right - box_w - 10.0;
    let box_y = plot_top + 10.0;

    let _ = writeln!(
        svg,
        r##"  <rect x="{box_x:.1}" y="{box_y:.1}" width="{box_w:.1}" height="{box_h:.1}" fill="#ffffff" fill-opacity="0.85" stroke="#cccccc"/>"##
    );
    for (index, series) in spec.series.iter().enumerate() {
        let row_y = box_y + 5.0 + entry_h * index as f64 + entry_h / 2.0;
        let dash = series
            .style
            .line_style
            .dash_array()
            .map(|pattern| format!(r##" stroke-dasharray="{pattern}""##))
            .unwrap_or_default();
        let _ = writeln!(
            svg,
            r##"  <line x1="{x1:.1}" y1="{row_y:.1}" x2="{x2:.1}" y2="{row_y:.1}" stroke="{color}" stroke-width="{width}"{dash}/>"##,
            x1 = box_x + 6.0,
            x2 = box_x + 6.0 + sample_w,
            color = escape_xml(&series.style.color),
            width = series.style.line_width,
        );
        let _ = writeln!(
            svg,
            r##"  <text x="{x:.1}" y="{y:.1}" font-family="{family}" font-size="{size}" fill="#1a1a1a">{label}</text>"##,
            x = box_x + 6.0 + sample_w + 8.0,
            y = row_y + spec.tick_font.size * 0.35,
            family = escape_xml(&spec.tick_font.family),
            size = spec.tick_font.size,
            label = escape_xml(&series.style.label),
        );
    }
}

/// Resolve the drawing ranges: a fixed bound pins its side of the axis, an
/// absent bound auto-fits the data span (padded) on that side only.
pub(crate) fn resolve_axes(spec: &PlotSpec) -> ((f64, f64), (f64, f64)) {
    let (data_x, data_y) = data_extents(&spec.series);

    let x = resolve_axis(spec.bounds.x_min, spec.bounds.x_max, data_x);
    let y = resolve_axis(spec.bounds.y_min, spec.bounds.y_max, data_y);
    (x, y)
}

fn resolve_axis(
    fixed_min: Option<f64>,
    fixed_max: Option<f64>,
    data: Option<(f64, f64)>,
) -> (f64, f64) {
    let (data_min, data_max) = data.unwrap_or((0.0, 1.0));
    let span = (data_max - data_min).abs();
    let padding = (span * PADDING_FRAC).max(MIN_PADDING);

    let min = fixed_min.unwrap_or(data_min - padding);
    let mut max = fixed_max.unwrap_or(data_max + padding);
    if !(min < max) {
        // Degenerate or inverted request; widen so the transform stays finite.
        max = min + MIN_PADDING.max(min.abs() * PADDING_FRAC);
    }
    (min, max)
}

fn data_extents(series: &[PlotSeries]) -> (Option<(f64, f64)>, Option<(f64, f64)>) {
    let mut x: Option<(f64, f64)> = None;
    let mut y: Option<(f64, f64)> = None;
    for row in series.iter().flat_map(|series| series.rows.iter()) {
        if row.iteration.is_finite() {
            x = Some(match x {
                Some((lo, hi)) => (lo.min(row.iteration), hi.max(row.iteration)),
                None => (row.iteration, row.iteration),
            });
        }
        if row.gradient_norm.is_finite() {
            y = Some(match y {
                Some((lo, hi)) => (lo.min(row.gradient_norm), hi.max(row.gradient_norm)),
                None => (row.gradient_norm, row.gradient_norm),
            });
        }
    }
    (x, y)
}

/// Tick positions at 1/2/5×10^k multiples covering `[min, max]`.
pub(crate) fn nice_ticks(min: f64, max: f64, desired: usize) -> Vec<f64> {
    let span = (max - min).max(f64::MIN_POSITIVE);
    let step = nice_round(span / desired.max(1) as f64);
    let mut ticks = Vec::new();
    let mut value = (min / step).ceil() * step;
    while value <= max + step * 1e-9 {
        // Snap near-zero accumulation noise.
        ticks.push(if value.abs() < step * 1e-9 { 0.0 } else { value });
        value += step;
    }
    ticks
}

fn nice_round(x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    let exp = x.log10().floor();
    let base = 10f64.powf(exp);
    let mantissa = x / base;
    let nice = if mantissa < 2.0 {
        2.0
    } else if mantissa < 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

pub(crate) fn format_tick(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e6 || magnitude < 1e-4 {
        format!("{value:.1e}")
    } else if magnitude >= 1.0 && value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        let formatted = format!("{value:.4}");
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
