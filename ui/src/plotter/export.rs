use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::core::platform;
use crate::core::export::{self, ImageFormat};
use crate::core::plot::PlotSpec;

use super::PlotterState;

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working(&'static str),
    Done(String),
    Error(String),
}

/// Export panel: chart image in the selected format, settings blob save and
/// load. Everything is all-or-nothing; failures surface as one status line
/// and the session stays usable.
#[component]
pub fn ExportPanel() -> Element {
    let state = use_context::<PlotterState>();
    let _ = (state.revision)();

    let has_files = state.has_files();
    let settings_len = state.settings_len();

    let format_value = use_signal(|| ImageFormat::Svg.label().to_string());
    let status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);

    let feedback = match &status() {
        ExportStatus::Idle => None,
        ExportStatus::Working(label) => {
            Some(("plotter-card__meta".to_string(), format!("{label}…")))
        }
        ExportStatus::Done(message) => Some((
            "plotter-card__meta plotter-card__meta--success".to_string(),
            format!("✅ {message}"),
        )),
        ExportStatus::Error(err) => Some((
            "plotter-card__meta plotter-card__meta--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    let on_format = {
        let mut format_value = format_value;
        move |evt: FormEvent| format_value.set(evt.value())
    };

    let image_handler = {
        let state = state.clone();
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if busy_signal() {
                return;
            }
            let format = match format_value().parse::<ImageFormat>() {
                Ok(format) => format,
                Err(err) => {
                    status_signal.set(ExportStatus::Error(err.to_string()));
                    return;
                }
            };
            // The export always reflects a fresh render of the current
            // controls, never a stale chart.
            let spec = match state.render() {
                Ok(outcome) => outcome.spec,
                Err(err) => {
                    status_signal.set(ExportStatus::Error(err));
                    return;
                }
            };

            busy_signal.set(true);
            status_signal.set(ExportStatus::Working("Preparing image"));

            #[cfg(target_arch = "wasm32")]
            {
                let status_signal = status_signal;
                let busy_signal = busy_signal;
                platform::spawn_future(async move {
                    let outcome = perform_image_export(spec, format).await;
                    let mut status_signal = status_signal;
                    let mut busy_signal = busy_signal;
                    match outcome {
                        Ok(message) => status_signal.set(ExportStatus::Done(message)),
                        Err(err) => status_signal.set(ExportStatus::Error(err)),
                    }
                    busy_signal.set(false);
                });
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let outcome = futures::executor::block_on(perform_image_export(spec, format));
                match outcome {
                    Ok(message) => status_signal.set(ExportStatus::Done(message)),
                    Err(err) => status_signal.set(ExportStatus::Error(err)),
                }
                busy_signal.set(false);
            }
        }
    };

    let settings_save_handler = {
        let state = state.clone();
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if busy_signal() {
                return;
            }
            let blob = match state.save_settings() {
                Ok(blob) => blob,
                Err(err) => {
                    status_signal.set(ExportStatus::Error(err));
                    return;
                }
            };

            busy_signal.set(true);
            status_signal.set(ExportStatus::Working("Preparing settings"));

            #[cfg(target_arch = "wasm32")]
            {
                let status_signal = status_signal;
                let busy_signal = busy_signal;
                platform::spawn_future(async move {
                    let outcome = perform_settings_export(blob).await;
                    let mut status_signal = status_signal;
                    let mut busy_signal = busy_signal;
                    match outcome {
                        Ok(message) => status_signal.set(ExportStatus::Done(message)),
                        Err(err) => status_signal.set(ExportStatus::Error(err)),
                    }
                    busy_signal.set(false);
                });
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let outcome = futures::executor::block_on(perform_settings_export(blob));
                match outcome {
                    Ok(message) => status_signal.set(ExportStatus::Done(message)),
                    Err(err) => status_signal.set(ExportStatus::Error(err)),
                }
                busy_signal.set(false);
            }
        }
    };

    let settings_load_handler = {
        let state = state.clone();
        let status_signal = status;
        move |evt: FormEvent| {
            let Some(file_engine) = evt.files() else {
                return;
            };
            let state = state.clone();
            spawn(async move {
                let mut status_signal = status_signal;
                let Some(name) = file_engine.files().into_iter().next() else {
                    return;
                };
                match file_engine.read_file(&name).await {
                    Some(bytes) => match state.load_settings(&bytes) {
                        Ok(()) => status_signal.set(ExportStatus::Done(format!(
                            "Settings loaded from {name}"
                        ))),
                        Err(err) => status_signal.set(ExportStatus::Error(err)),
                    },
                    None => status_signal
                        .set(ExportStatus::Error(format!("Couldn't read {name}"))),
                }
            });
        }
    };

    rsx! {
        section { class: "plotter-card plotter-export",
            div { class: "plotter-card__header",
                h2 { "Export" }
                if settings_len > 0 {
                    span { class: "plotter-card__meta", "{settings_len} styles remembered" }
                }
            }

            label { class: "plotter-field",
                span { "Download format" }
                select {
                    value: "{format_value()}",
                    oninput: on_format,
                    for format in ImageFormat::ALL {
                        option {
                            value: "{format.label()}",
                            selected: format.label() == format_value(),
                            "{format.label()}"
                        }
                    }
                }
            }

            div { class: "plotter-export__actions",
                button {
                    r#type: "button",
                    class: "button button--primary",
                    disabled: busy() || !has_files,
                    onclick: image_handler,
                    "Download plot"
                }
                button {
                    r#type: "button",
                    class: "button",
                    disabled: busy(),
                    onclick: settings_save_handler,
                    "Save settings"
                }
            }

            label { class: "plotter-field",
                span { "Load settings" }
                input {
                    r#type: "file",
                    accept: ".json,application/json",
                    onchange: settings_load_handler,
                }
            }

            if let Some((class_name, message)) = feedback {
                p { class: "{class_name}", "{message}" }
            }
        }
    }
}

async fn perform_image_export(spec: PlotSpec, format: ImageFormat) -> Result<String, String> {
    let bytes = export::render_image(&spec, format).map_err(|err| err.to_string())?;
    let filename = export::image_filename(format);
    let delivery = download_bytes(&filename, format.mime(), bytes).await?;
    Ok(match delivery {
        Some(path) => format!("{} saved to {path}", format.label()),
        None => format!("{} download started", format.label()),
    })
}

async fn perform_settings_export(blob: Vec<u8>) -> Result<String, String> {
    let json = String::from_utf8(blob.clone()).map_err(|err| err.to_string())?;
    copy_to_clipboard(json).await?;
    let filename = export::settings_filename();
    let delivery = download_bytes(&filename, "application/json", blob).await?;
    Ok(match delivery {
        Some(path) => format!("Settings copied and saved to {path}"),
        None => "Settings copied to clipboard and download started".to_string(),
    })
}

async fn copy_to_clipboard(payload: String) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;

        let window = web_sys::window().ok_or("window unavailable")?;
        let document = window.document().ok_or("document unavailable")?;
        let body = document.body().ok_or("missing body")?;

        let textarea = document
            .create_element("textarea")
            .map_err(|_| "Unable to create textarea")?
            .dyn_into::<web_sys::HtmlTextAreaElement>()
            .map_err(|_| "Textarea cast failed")?;
        textarea.set_value(&payload);
        let style = textarea.style();
        style.set_property("position", "fixed").ok();
        style.set_property("top", "0").ok();
        style.set_property("left", "0").ok();
        style.set_property("opacity", "0").ok();

        body.append_child(&textarea).ok();
        textarea.select();
        if !document.exec_command("copy").unwrap_or(false) {
            textarea.remove();
            return Err("Clipboard copy blocked".into());
        }
        textarea.remove();
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use arboard::Clipboard;

        let mut clipboard = Clipboard::new().map_err(|err| err.to_string())?;
        clipboard.set_text(payload).map_err(|err| err.to_string())
    }
}

async fn download_bytes(
    filename: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let mut opts = BlobPropertyBag::new();
        opts.type_(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("Document unavailable")?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Unable to create anchor")?
            .dyn_into()
            .map_err(|_| "Anchor cast failed")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("Missing body")?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;
        use std::io::Write;

        let _ = mime;
        let dir = desktop_export_dir()?;
        fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let path = dir.join(filename);
        let mut file = fs::File::create(&path).map_err(|err| err.to_string())?;
        file.write_all(&bytes).map_err(|err| err.to_string())?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn desktop_export_dir() -> Result<std::path::PathBuf, String> {
    let dirs = directories::ProjectDirs::from("dev", "Normplot", "Normplot")
        .ok_or("Unable to determine export directory")?;
    let dir = dirs.data_dir().join("exports");
    Ok(dir)
}
