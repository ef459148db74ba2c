use dioxus::prelude::*;

use super::PlotterState;
use crate::core::format;
use crate::core::plot::{FIGURE_MAX, FIGURE_MIN};
use crate::core::style::{LineStyle, LINE_WIDTH_MAX, LINE_WIDTH_MIN};

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Chart-wide options: figure size, texts, grid, fonts, axis bounds.
#[component]
pub fn GlobalControlsPanel() -> Element {
    let state = use_context::<PlotterState>();
    let options = (state.options)();

    let edit = |apply: fn(&mut crate::core::plot::PlotOptions, String)| {
        let state = state.clone();
        move |evt: FormEvent| {
            state.edit_options(|options| apply(options, evt.value()));
        }
    };

    let on_grid = {
        let state = state.clone();
        move |evt: FormEvent| {
            state.edit_options(|options| options.grid = evt.checked());
        }
    };

    let figure_caption = format::format_figure(options.width, options.height);

    rsx! {
        section { class: "plotter-card plotter-globals",
            div { class: "plotter-card__header",
                h2 { "Chart" }
                span { class: "plotter-card__meta", "{figure_caption}" }
            }

            label { class: "plotter-field",
                span { "Figure width" }
                input {
                    r#type: "range",
                    min: "{FIGURE_MIN}",
                    max: "{FIGURE_MAX}",
                    step: "1",
                    value: "{options.width}",
                    oninput: edit(|options, value| {
                        if let Some(width) = parse_number(&value) {
                            options.width = width;
                        }
                    }),
                }
            }
            label { class: "plotter-field",
                span { "Figure height" }
                input {
                    r#type: "range",
                    min: "{FIGURE_MIN}",
                    max: "{FIGURE_MAX}",
                    step: "1",
                    value: "{options.height}",
                    oninput: edit(|options, value| {
                        if let Some(height) = parse_number(&value) {
                            options.height = height;
                        }
                    }),
                }
            }

            label { class: "plotter-field",
                span { "Plot title" }
                input {
                    r#type: "text",
                    value: "{options.title}",
                    oninput: edit(|options, value| options.title = value),
                }
            }
            label { class: "plotter-field",
                span { "X-axis label" }
                input {
                    r#type: "text",
                    value: "{options.x_label}",
                    oninput: edit(|options, value| options.x_label = value),
                }
            }
            label { class: "plotter-field",
                span { "Y-axis label" }
                input {
                    r#type: "text",
                    value: "{options.y_label}",
                    oninput: edit(|options, value| options.y_label = value),
                }
            }

            label { class: "plotter-field plotter-field--inline",
                input {
                    r#type: "checkbox",
                    checked: options.grid,
                    onchange: on_grid,
                }
                span { "Show grid" }
            }

            div { class: "plotter-field-group",
                h3 { "Fonts" }
                label { class: "plotter-field",
                    span { "Title size" }
                    input {
                        r#type: "number",
                        min: "6",
                        max: "48",
                        value: "{options.title_size}",
                        oninput: edit(|options, value| {
                            if let Some(size) = parse_number(&value) {
                                options.title_size = size;
                            }
                        }),
                    }
                }
                label { class: "plotter-field",
                    span { "Label size" }
                    input {
                        r#type: "number",
                        min: "6",
                        max: "48",
                        value: "{options.label_size}",
                        oninput: edit(|options, value| {
                            if let Some(size) = parse_number(&value) {
                                options.label_size = size;
                            }
                        }),
                    }
                }
                label { class: "plotter-field",
                    span { "Tick size" }
                    input {
                        r#type: "number",
                        min: "6",
                        max: "48",
                        value: "{options.tick_size}",
                        oninput: edit(|options, value| {
                            if let Some(size) = parse_number(&value) {
                                options.tick_size = size;
                            }
                        }),
                    }
                }
            }

            div { class: "plotter-field-group",
                h3 {
                    if options.bounds.is_auto() { "Axis bounds (auto)" } else { "Axis bounds" }
                }
                p { class: "plotter-card__hint", "Leave a field empty to auto-scale that side." }
                label { class: "plotter-field",
                    span { "X min" }
                    input {
                        r#type: "number",
                        step: "any",
                        value: bound_value(options.bounds.x_min),
                        oninput: edit(|options, value| options.bounds.x_min = parse_number(&value)),
                    }
                }
                label { class: "plotter-field",
                    span { "X max" }
                    input {
                        r#type: "number",
                        step: "any",
                        value: bound_value(options.bounds.x_max),
                        oninput: edit(|options, value| options.bounds.x_max = parse_number(&value)),
                    }
                }
                label { class: "plotter-field",
                    span { "Y min" }
                    input {
                        r#type: "number",
                        step: "any",
                        value: bound_value(options.bounds.y_min),
                        oninput: edit(|options, value| options.bounds.y_min = parse_number(&value)),
                    }
                }
                label { class: "plotter-field",
                    span { "Y max" }
                    input {
                        r#type: "number",
                        step: "any",
                        value: bound_value(options.bounds.y_max),
                        oninput: edit(|options, value| options.bounds.y_max = parse_number(&value)),
                    }
                }
            }
        }
    }
}

fn bound_value(bound: Option<f64>) -> String {
    bound.map(|value| value.to_string()).unwrap_or_default()
}

/// Per-series styling: one control block per uploaded file, keyed by the
/// series name, editing that series' override entry.
#[component]
pub fn SeriesControlsPanel() -> Element {
    let state = use_context::<PlotterState>();
    let _ = (state.revision)();
    let _ = (state.overrides)();

    let names = state.series_names();

    rsx! {
        section { class: "plotter-card plotter-series",
            div { class: "plotter-card__header",
                h2 { "Series styling" }
                if !names.is_empty() {
                    span { class: "plotter-card__meta", "{names.len()} curves" }
                }
            }

            if names.is_empty() {
                p { class: "plotter-card__placeholder",
                    "Per-curve color, stroke and label controls appear after an upload."
                }
            } else {
                for name in names.into_iter() {
                    {series_controls(&state, name)}
                }
            }
        }
    }
}

fn series_controls(state: &PlotterState, name: String) -> Element {
    let style = state.effective_style(&name);
    let width_caption = format::format_number(style.line_width, 1);
    let edited = (state.overrides)()
        .get(&name)
        .map(|overrides| !overrides.is_empty())
        .unwrap_or(false);

    let on_color = {
        let state = state.clone();
        let name = name.clone();
        move |evt: FormEvent| {
            state.edit_override(&name, |overrides| overrides.color = Some(evt.value()));
        }
    };
    let on_style = {
        let state = state.clone();
        let name = name.clone();
        move |evt: FormEvent| {
            let token = evt.value();
            state.edit_override(&name, |overrides| {
                overrides.line_style = LineStyle::from_token(&token);
            });
        }
    };
    let on_width = {
        let state = state.clone();
        let name = name.clone();
        move |evt: FormEvent| {
            if let Some(width) = parse_number(&evt.value()) {
                state.edit_override(&name, |overrides| overrides.line_width = Some(width));
            }
        }
    };
    let on_label = {
        let state = state.clone();
        let name = name.clone();
        move |evt: FormEvent| {
            state.edit_override(&name, |overrides| overrides.label = Some(evt.value()));
        }
    };

    rsx! {
        div { class: "plotter-series__entry", key: "{name}",
            h3 { class: "plotter-series__name",
                "{name}"
                if edited {
                    span { class: "plotter-series__edited", " · edited" }
                }
            }

            label { class: "plotter-field",
                span { "Line color" }
                input {
                    r#type: "color",
                    value: "{style.color}",
                    oninput: on_color,
                }
            }

            label { class: "plotter-field",
                span { "Line style" }
                select {
                    value: "{style.line_style.token()}",
                    oninput: on_style,
                    for option_style in LineStyle::ALL {
                        option {
                            value: "{option_style.token()}",
                            selected: option_style == style.line_style,
                            "{option_style.token()}"
                        }
                    }
                }
            }

            label { class: "plotter-field",
                span { "Line width ({width_caption})" }
                input {
                    r#type: "range",
                    min: "{LINE_WIDTH_MIN}",
                    max: "{LINE_WIDTH_MAX}",
                    step: "0.1",
                    value: "{style.line_width}",
                    oninput: on_width,
                }
            }

            label { class: "plotter-field",
                span { "Legend label" }
                input {
                    r#type: "text",
                    value: "{style.label}",
                    oninput: on_label,
                }
            }
        }
    }
}
