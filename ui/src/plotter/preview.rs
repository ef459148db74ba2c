use dioxus::prelude::*;

use super::PlotterState;
use crate::core::session::SessionPhase;

/// Live chart preview. Runs a full render pass against the current widget
/// state; the same SVG markup later backs the SVG download, so the preview
/// is exact. Errors replace the chart wholesale; never a partial plot.
#[component]
pub fn ChartPreview() -> Element {
    let state = use_context::<PlotterState>();
    // Subscribe to structural changes even on the empty path, so the first
    // upload swaps the placeholder for a chart.
    let _ = (state.revision)();

    if !state.has_files() {
        let hint = if state.phase() == SessionPhase::SettingsLoaded {
            "Styling defaults are loaded; upload training logs to apply them."
        } else {
            "Upload one or more training logs to see the gradient norm chart."
        };
        return rsx! {
            section { class: "plotter-card plotter-preview",
                div { class: "plotter-card__header",
                    h2 { "Preview" }
                }
                p { class: "plotter-card__placeholder", "{hint}" }
            }
        };
    }

    match state.render() {
        Ok(outcome) => {
            let legend = outcome.spec.legend().join(" · ");
            let series_count = outcome.spec.series.len();
            rsx! {
                section { class: "plotter-card plotter-preview",
                    div { class: "plotter-card__header",
                        h2 { "Preview" }
                        span { class: "plotter-card__meta",
                            "{series_count} curves · {legend}"
                        }
                    }
                    div {
                        class: "plotter-preview__chart",
                        dangerous_inner_html: "{outcome.svg}",
                    }
                }
            }
        }
        Err(message) => rsx! {
            section { class: "plotter-card plotter-preview",
                div { class: "plotter-card__header",
                    h2 { "Preview" }
                }
                p { class: "plotter-card__error", "⚠️ {message}" }
            }
        },
    }
}
