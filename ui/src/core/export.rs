//! Export adapter: chart bytes in SVG or PDF, settings bytes as JSON.
//!
//! Rendering is all-or-nothing; nothing is partially written and nothing
//! retries. The only negotiable part is the format, and an unknown one is
//! rejected up front when the selector value is parsed.

use std::fmt;
use std::str::FromStr;

use printpdf::{BuiltinFont, IndirectFontRef, PdfDocument, PdfLayerReference};
use time::{macros::format_description, OffsetDateTime};

use super::error::{PlotError, PlotResult};
use super::plot::PlotSpec;
use super::render::{
    self, format_tick, nice_ticks, pixel_size, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT,
    MARGIN_TOP,
};
use super::settings::SettingsStore;
use super::style::LineStyle;

const PX_TO_MM: f64 = 0.264583;

/// Image formats this exporter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Pdf,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 2] = [ImageFormat::Svg, ImageFormat::Pdf];

    /// Selector label (`SVG` / `PDF`).
    pub fn label(self) -> &'static str {
        match self {
            ImageFormat::Svg => "SVG",
            ImageFormat::Pdf => "PDF",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Svg => "application/svg",
            ImageFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ImageFormat {
    type Err = PlotError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "pdf" => Ok(ImageFormat::Pdf),
            _ => Err(PlotError::UnsupportedFormat(raw.trim().to_string())),
        }
    }
}

/// Download filename for the chart image.
pub fn image_filename(format: ImageFormat) -> String {
    format!("gradient_norm_plot.{}", format.extension())
}

/// Download filename for the settings blob, stamped like the other exports.
pub fn settings_filename() -> String {
    format!("gradient_norm_settings-{}.json", timestamp_slug())
}

fn timestamp_slug() -> String {
    OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "export".into())
}

/// Serialize the chart into the requested image format.
pub fn render_image(spec: &PlotSpec, format: ImageFormat) -> PlotResult<Vec<u8>> {
    match format {
        ImageFormat::Svg => Ok(render::render_svg(spec).into_bytes()),
        ImageFormat::Pdf => render_pdf(spec),
    }
}

/// Serialize the settings store verbatim.
pub fn render_settings(store: &SettingsStore) -> PlotResult<Vec<u8>> {
    store.save()
}

/// Vector PDF rendition of the chart: the same layout math as the SVG
/// composer, drawn through printpdf primitives.
fn render_pdf(spec: &PlotSpec) -> PlotResult<Vec<u8>> {
    let (width_px, height_px) = pixel_size(spec);
    let page_w = printpdf::Mm(width_px * PX_TO_MM);
    let page_h = printpdf::Mm(height_px * PX_TO_MM);

    let doc = PdfDocument::empty("gradient_norm_plot");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| PlotError::ExportFailed(err.to_string()))?;
    let (page_index, layer_index) = doc.add_page(page_w, page_h, "chart");
    let layer = doc.get_page(page_index).get_layer(layer_index);

    let chart = PdfChart {
        layer,
        font,
        width_px,
        height_px,
    };
    chart.draw(spec);

    let mut bytes = Vec::new();
    {
        let mut writer = std::io::BufWriter::new(&mut bytes);
        doc.save(&mut writer)
            .map_err(|err| PlotError::ExportFailed(err.to_string()))?;
    }
    Ok(bytes)
}

struct PdfChart {
    layer: PdfLayerReference,
    font: IndirectFontRef,
    width_px: f64,
    height_px: f64,
}

impl PdfChart {
    /// Map SVG-style pixel coordinates (origin top-left) onto the PDF page
    /// (origin bottom-left, millimetres).
    fn point(&self, x_px: f64, y_px: f64) -> printpdf::Point {
        printpdf::Point::new(
            printpdf::Mm(x_px * PX_TO_MM),
            printpdf::Mm((self.height_px - y_px) * PX_TO_MM),
        )
    }

    fn stroke(&self, points: Vec<printpdf::Point>) {
        let points = points.into_iter().map(|point| (point, false)).collect();
        self.layer.add_shape(printpdf::Line {
            points,
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        });
    }

    fn set_stroke_color(&self, hex: &str) {
        let (r, g, b) = hex_rgb(hex);
        self.layer
            .set_outline_color(printpdf::Color::Rgb(printpdf::Rgb::new(r, g, b, None)));
    }

    fn set_dash(&self, style: LineStyle) {
        let pattern = match style {
            LineStyle::Solid => printpdf::LineDashPattern::default(),
            LineStyle::Dashed => printpdf::LineDashPattern {
                dash_1: Some(6),
                gap_1: Some(3),
                ..printpdf::LineDashPattern::default()
            },
            LineStyle::DashDot => printpdf::LineDashPattern {
                dash_1: Some(6),
                gap_1: Some(2),
                dash_2: Some(1),
                gap_2: Some(2),
                ..printpdf::LineDashPattern::default()
            },
            LineStyle::Dotted => printpdf::LineDashPattern {
                dash_1: Some(1),
                gap_1: Some(2),
                ..printpdf::LineDashPattern::default()
            },
        };
        self.layer.set_line_dash_pattern(pattern);
    }

    fn text(&self, text: &str, size: f64, x_px: f64, y_px: f64) {
        let layer = &self.layer;
        layer.begin_text_section();
        layer.set_font(&self.font, size);
        layer.set_text_cursor(
            printpdf::Mm(x_px * PX_TO_MM),
            printpdf::Mm((self.height_px - y_px) * PX_TO_MM),
        );
        layer.write_text(text, &self.font);
        layer.end_text_section();
    }

    fn draw(&self, spec: &PlotSpec) {
        let plot_left = MARGIN_LEFT;
        let plot_right = self.width_px - MARGIN_RIGHT;
        let plot_top = MARGIN_TOP;
        let plot_bottom = self.height_px - MARGIN_BOTTOM;

        let ((x_min, x_max), (y_min, y_max)) = render::resolve_axes(spec);
        let to_px = |x: f64, y: f64| -> (f64, f64) {
            let px = plot_left + (x - x_min) / (x_max - x_min) * (plot_right - plot_left);
            let py = plot_bottom - (y - y_min) / (y_max - y_min) * (plot_bottom - plot_top);
            (px, py)
        };

        let x_ticks = nice_ticks(x_min, x_max, 6);
        let y_ticks = nice_ticks(y_min, y_max, 5);

        // Grid first so curves draw over it.
        if spec.grid {
            self.set_stroke_color("#d9d9d9");
            self.layer.set_outline_thickness(0.4);
            for &tick in &x_ticks {
                let (px, _) = to_px(tick, y_min);
                self.stroke(vec![self.point(px, plot_top), self.point(px, plot_bottom)]);
            }
            for &tick in &y_ticks {
                let (_, py) = to_px(x_min, tick);
                self.stroke(vec![
                    self.point(plot_left, py),
                    self.point(plot_right, py),
                ]);
            }
        }

        // Axes, ticks, labels.
        self.set_stroke_color("#333333");
        self.layer.set_outline_thickness(0.6);
        self.stroke(vec![
            self.point(plot_left, plot_bottom),
            self.point(plot_right, plot_bottom),
        ]);
        self.stroke(vec![
            self.point(plot_left, plot_top),
            self.point(plot_left, plot_bottom),
        ]);
        for &tick in &x_ticks {
            let (px, _) = to_px(tick, y_min);
            self.stroke(vec![
                self.point(px, plot_bottom),
                self.point(px, plot_bottom + 5.0),
            ]);
            self.text(
                &format_tick(tick),
                spec.tick_font.size,
                px - 6.0,
                plot_bottom + 7.0 + spec.tick_font.size,
            );
        }
        for &tick in &y_ticks {
            let (_, py) = to_px(x_min, tick);
            self.stroke(vec![
                self.point(plot_left - 5.0, py),
                self.point(plot_left, py),
            ]);
            self.text(
                &format_tick(tick),
                spec.tick_font.size,
                8.0,
                py + spec.tick_font.size * 0.35,
            );
        }

        if !spec.title.is_empty() {
            self.text(
                &spec.title,
                spec.title_font.size,
                plot_left + (plot_right - plot_left) / 2.0 - spec.title.chars().count() as f64 * spec.title_font.size * 0.25,
                MARGIN_TOP - 18.0,
            );
        }
        if !spec.x_label.is_empty() {
            self.text(
                &spec.x_label,
                spec.label_font.size,
                plot_left + (plot_right - plot_left) / 2.0 - spec.x_label.chars().count() as f64 * spec.label_font.size * 0.25,
                self.height_px - 14.0,
            );
        }
        if !spec.y_label.is_empty() {
            // Horizontal near the top-left corner; printpdf text rotation is
            // not worth the trouble for one label.
            self.text(&spec.y_label, spec.label_font.size, 8.0, MARGIN_TOP - 4.0);
        }

        // Curves.
        for series in &spec.series {
            self.set_stroke_color(&series.style.color);
            self.set_dash(series.style.line_style);
            self.layer.set_outline_thickness(series.style.line_width);
            let points = series
                .rows
                .iter()
                .map(|row| {
                    let (px, py) = to_px(row.iteration, row.gradient_norm);
                    self.point(px, py)
                })
                .collect::<Vec<_>>();
            if points.len() > 1 {
                self.stroke(points);
            }
        }
        self.set_dash(LineStyle::Solid);

        // Legend: sample stroke plus label, one row per series, in order.
        if !spec.series.is_empty() {
            let entry_h = spec.tick_font.size + 8.0;
            let box_x = plot_right - 150.0;
            let mut row_y = plot_top + 18.0;
            for series in &spec.series {
                self.set_stroke_color(&series.style.color);
                self.set_dash(series.style.line_style);
                self.layer.set_outline_thickness(series.style.line_width);
                self.stroke(vec![
                    self.point(box_x, row_y),
                    self.point(box_x + 26.0, row_y),
                ]);
                self.set_dash(LineStyle::Solid);
                self.text(
                    &series.style.label,
                    spec.tick_font.size,
                    box_x + 34.0,
                    row_y + spec.tick_font.size * 0.35,
                );
                row_y += entry_h;
            }
        }
    }
}

fn hex_rgb(hex: &str) -> (f64, f64, f64) {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return (0.0, 0.0, 0.0);
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).unwrap_or(0) as f64 / 255.0
    };
    (channel(0..2), channel(2..4), channel(4..6))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decode::decode;
    use crate::core::plot::{compose, PlotOptions, PlotSeries};
    use crate::core::style::SeriesStyle;

    fn sample_spec() -> PlotSpec {
        let series = PlotSeries {
            name: "a.json".into(),
            rows: decode("a.json", br#"[["t0",1,0.5],["t1",2,0.3],["t2",3,0.2]]"#).unwrap(),
            style: SeriesStyle::fallback("a.json"),
        };
        compose(vec![series], &PlotOptions::default())
    }

    #[test]
    fn parses_known_formats_case_insensitively() {
        assert_eq!("SVG".parse::<ImageFormat>().unwrap(), ImageFormat::Svg);
        assert_eq!("pdf".parse::<ImageFormat>().unwrap(), ImageFormat::Pdf);
    }

    #[test]
    fn png_is_unsupported() {
        let err = "png".parse::<ImageFormat>().unwrap_err();
        assert_eq!(err, PlotError::UnsupportedFormat("png".into()));
    }

    #[test]
    fn svg_export_is_markup() {
        let bytes = render_image(&sample_spec(), ImageFormat::Svg).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("<svg"));
        assert!(text.contains("<polyline"));
    }

    #[test]
    fn pdf_export_has_pdf_magic() {
        let bytes = render_image(&sample_spec(), ImageFormat::Pdf).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn mime_types_match_the_download_contract() {
        assert_eq!(ImageFormat::Svg.mime(), "application/svg");
        assert_eq!(ImageFormat::Pdf.mime(), "application/pdf");
    }

    #[test]
    fn filenames_follow_the_format() {
        assert_eq!(image_filename(ImageFormat::Svg), "gradient_norm_plot.svg");
        assert_eq!(image_filename(ImageFormat::Pdf), "gradient_norm_plot.pdf");
        assert!(settings_filename().starts_with("gradient_norm_settings-"));
        assert!(settings_filename().ends_with(".json"));
    }
}
