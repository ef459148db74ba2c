use dioxus::prelude::*;

use super::PlotterState;

/// Multi-file JSON upload. Files read sequentially in selection order; the
/// session swaps in the whole set or none of it.
#[component]
pub fn UploadPanel() -> Element {
    let state = use_context::<PlotterState>();
    let _ = (state.revision)();

    let series = state.series_summary();
    let error = (state.upload_error)();

    let on_files = {
        let state = state.clone();
        move |evt: FormEvent| {
            let Some(file_engine) = evt.files() else {
                return;
            };
            let state = state.clone();
            spawn(async move {
                let mut files = Vec::new();
                for name in file_engine.files() {
                    if let Some(bytes) = file_engine.read_file(&name).await {
                        files.push((name, bytes));
                    }
                }
                state.ingest_files(files);
            });
        }
    };

    rsx! {
        section { class: "plotter-card plotter-upload",
            div { class: "plotter-card__header",
                h2 { "Training logs" }
                if !series.is_empty() {
                    span { class: "plotter-card__meta", "{series.len()} loaded" }
                }
            }

            p { class: "plotter-card__hint",
                "Drop JSON files with timestamp, iteration and gradient_norm columns."
            }

            input {
                r#type: "file",
                accept: ".json,application/json",
                multiple: true,
                onchange: on_files,
            }

            if let Some(message) = error {
                p { class: "plotter-card__error", "⚠️ {message}" }
            }

            if series.is_empty() {
                p { class: "plotter-card__placeholder",
                    "Uploaded runs will appear here, one curve per file."
                }
            } else {
                ul { class: "plotter-upload__files",
                    for (name, rows) in series.into_iter() {
                        li { key: "{name}",
                            span { class: "plotter-upload__name", "{name}" }
                            span { class: "plotter-upload__rows", "{rows} rows" }
                        }
                    }
                }
            }
        }
    }
}
