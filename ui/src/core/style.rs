//! Per-series curve styling and the override/default resolution chain.

use serde::{Deserialize, Serialize};

/// Color every new series starts with (the original tool's picker default).
pub const DEFAULT_COLOR: &str = "#00f900";
pub const DEFAULT_LINE_WIDTH: f64 = 1.5;
pub const LINE_WIDTH_MIN: f64 = 0.5;
pub const LINE_WIDTH_MAX: f64 = 5.0;

/// Stroke pattern for a curve. Serialized by name in settings blobs; the
/// widget layer speaks the short matplotlib-style tokens instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

impl LineStyle {
    pub const ALL: [LineStyle; 4] = [
        LineStyle::Solid,
        LineStyle::Dashed,
        LineStyle::DashDot,
        LineStyle::Dotted,
    ];

    /// Short selector token (`-`, `--`, `-.`, `:`).
    pub fn token(self) -> &'static str {
        match self {
            LineStyle::Solid => "-",
            LineStyle::Dashed => "--",
            LineStyle::DashDot => "-.",
            LineStyle::Dotted => ":",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.token() == token)
    }

    /// SVG `stroke-dasharray` value, `None` for a solid stroke.
    pub fn dash_array(self) -> Option<&'static str> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some("8 4"),
            LineStyle::DashDot => Some("8 3 2 3"),
            LineStyle::Dotted => Some("2 3"),
        }
    }
}

/// Effective style for one curve. Keyed by series (file) name in the
/// settings map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub color: String,
    pub line_style: LineStyle,
    pub line_width: f64,
    pub label: String,
}

impl SeriesStyle {
    /// The hard-coded defaults used when neither the UI nor the settings
    /// store knows anything about a series.
    pub fn fallback(series_name: &str) -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            line_style: LineStyle::default(),
            line_width: DEFAULT_LINE_WIDTH,
            label: series_name.to_string(),
        }
    }

    /// Re-establish the style invariants after deserialization or UI edits:
    /// widths clamp into range, labels never collapse to empty.
    pub fn sanitized(mut self, series_name: &str) -> Self {
        self.line_width = clamp_line_width(self.line_width);
        if self.label.trim().is_empty() {
            self.label = series_name.to_string();
        }
        self
    }
}

/// Partial style coming from the widget layer. A `None` field means the user
/// has not touched that control for this series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverrides {
    pub color: Option<String>,
    pub line_style: Option<LineStyle>,
    pub line_width: Option<f64>,
    pub label: Option<String>,
}

impl StyleOverrides {
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.line_style.is_none()
            && self.line_width.is_none()
            && self.label.is_none()
    }
}

/// Resolve the effective style for one series.
///
/// Each field falls back independently: an explicit UI override wins, then
/// the stored default for that series, then the hard-coded default. A user
/// who only picked a color still inherits the stored line style.
pub fn resolve(
    series_name: &str,
    overrides: &StyleOverrides,
    stored: Option<&SeriesStyle>,
) -> SeriesStyle {
    let fallback = SeriesStyle::fallback(series_name);

    let color = overrides
        .color
        .as_deref()
        .and_then(normalize_color)
        .or_else(|| stored.map(|style| style.color.clone()))
        .unwrap_or(fallback.color);

    let line_style = overrides
        .line_style
        .or_else(|| stored.map(|style| style.line_style))
        .unwrap_or(fallback.line_style);

    let line_width = overrides
        .line_width
        .or_else(|| stored.map(|style| style.line_width))
        .unwrap_or(fallback.line_width);

    let label = overrides
        .label
        .clone()
        .filter(|label| !label.trim().is_empty())
        .or_else(|| stored.map(|style| style.label.clone()))
        .unwrap_or(fallback.label);

    SeriesStyle {
        color,
        line_style,
        line_width: clamp_line_width(line_width),
        label,
    }
}

pub fn clamp_line_width(width: f64) -> f64 {
    if width.is_nan() {
        return DEFAULT_LINE_WIDTH;
    }
    width.clamp(LINE_WIDTH_MIN, LINE_WIDTH_MAX)
}

/// Validate and normalize a `#rrggbb` color. Shorthand `#rgb` expands; an
/// unparseable value is treated as absent by the resolver.
pub fn normalize_color(raw: &str) -> Option<String> {
    let hex = raw.trim().strip_prefix('#')?;
    let expanded = match hex.len() {
        3 => hex
            .chars()
            .flat_map(|c| [c, c])
            .collect::<String>(),
        6 => hex.to_string(),
        _ => return None,
    };
    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", expanded.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_coded_defaults_when_nothing_is_known() {
        let style = resolve("run-a.json", &StyleOverrides::default(), None);
        assert_eq!(style.color, DEFAULT_COLOR);
        assert_eq!(style.line_style, LineStyle::Solid);
        assert_eq!(style.line_width, DEFAULT_LINE_WIDTH);
        assert_eq!(style.label, "run-a.json");
    }

    #[test]
    fn stored_default_wins_over_fallback() {
        let stored = SeriesStyle {
            color: "#ff0000".into(),
            line_style: LineStyle::Dashed,
            line_width: 3.0,
            label: "warmup".into(),
        };
        let style = resolve("run-a.json", &StyleOverrides::default(), Some(&stored));
        assert_eq!(style, stored);
    }

    #[test]
    fn override_is_per_field_not_per_style() {
        let stored = SeriesStyle {
            color: "#ff0000".into(),
            line_style: LineStyle::Dashed,
            line_width: 3.0,
            label: "warmup".into(),
        };
        let overrides = StyleOverrides {
            color: Some("#0000ff".into()),
            ..Default::default()
        };
        let style = resolve("run-a.json", &overrides, Some(&stored));
        assert_eq!(style.color, "#0000ff");
        // Untouched fields keep falling back to the stored default.
        assert_eq!(style.line_style, LineStyle::Dashed);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.label, "warmup");
    }

    #[test]
    fn invalid_override_color_is_treated_as_absent() {
        let overrides = StyleOverrides {
            color: Some("chartreuse".into()),
            ..Default::default()
        };
        let style = resolve("run-a.json", &overrides, None);
        assert_eq!(style.color, DEFAULT_COLOR);
    }

    #[test]
    fn line_width_clamps_to_declared_range() {
        let overrides = StyleOverrides {
            line_width: Some(12.0),
            ..Default::default()
        };
        assert_eq!(
            resolve("a", &overrides, None).line_width,
            LINE_WIDTH_MAX
        );
        let overrides = StyleOverrides {
            line_width: Some(0.0),
            ..Default::default()
        };
        assert_eq!(
            resolve("a", &overrides, None).line_width,
            LINE_WIDTH_MIN
        );
    }

    #[test]
    fn tokens_round_trip() {
        for style in LineStyle::ALL {
            assert_eq!(LineStyle::from_token(style.token()), Some(style));
        }
        assert_eq!(LineStyle::from_token("=="), None);
    }

    #[test]
    fn color_normalization() {
        assert_eq!(normalize_color("#00F900"), Some("#00f900".into()));
        assert_eq!(normalize_color(" #abc "), Some("#aabbcc".into()));
        assert_eq!(normalize_color("#12345"), None);
        assert_eq!(normalize_color("00f900"), None);
        assert_eq!(normalize_color("#gg0000"), None);
    }
}
