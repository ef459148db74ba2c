//! Formatting helpers for control captions.

pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

pub fn format_figure(width: f64, height: f64) -> String {
    format!("{width:.0} × {height:.0}")
}
