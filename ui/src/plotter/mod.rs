//! Interactive plotter: shared state plus the four panels (upload, global
//! controls, per-series controls + preview, export).

mod upload;
pub use upload::UploadPanel;

mod controls;
pub use controls::{GlobalControlsPanel, SeriesControlsPanel};

mod preview;
pub use preview::ChartPreview;

mod export;
pub use export::ExportPanel;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use dioxus::prelude::*;

use crate::core::plot::PlotOptions;
use crate::core::session::{PlotterSession, RenderOutcome, SessionPhase};
use crate::core::style::{resolve, SeriesStyle, StyleOverrides};

/// Shared handle the panels reach through context.
///
/// The session sits outside the signal graph (plain `Rc<RefCell<_>>`) so that
/// `record` during a render pass can't re-trigger rendering; structural
/// mutations (upload, settings load) bump `revision` explicitly. Widget state
/// (global options, per-series overrides) is ordinary reactive state.
#[derive(Clone)]
pub struct PlotterState {
    session: Rc<RefCell<PlotterSession>>,
    pub revision: Signal<u64>,
    pub options: Signal<PlotOptions>,
    pub overrides: Signal<HashMap<String, StyleOverrides>>,
    pub upload_error: Signal<Option<String>>,
}

impl PlotterState {
    pub fn phase(&self) -> SessionPhase {
        self.session.borrow().phase()
    }

    pub fn has_files(&self) -> bool {
        self.session.borrow().has_files()
    }

    /// Series names with their row counts, in upload order.
    pub fn series_summary(&self) -> Vec<(String, usize)> {
        self.session
            .borrow()
            .series()
            .iter()
            .map(|series| (series.name.clone(), series.rows.len()))
            .collect()
    }

    pub fn series_names(&self) -> Vec<String> {
        self.session.borrow().series_names()
    }

    pub fn settings_len(&self) -> usize {
        self.session.borrow().store().len()
    }

    /// Replace the upload set. All-or-nothing; failures leave the previous
    /// set in place and surface as the panel's error message.
    pub fn ingest_files(&self, files: Vec<(String, Vec<u8>)>) {
        let mut upload_error = self.upload_error;
        let mut revision = self.revision;
        match self.session.borrow_mut().ingest_files(files) {
            Ok(()) => upload_error.set(None),
            Err(err) => upload_error.set(Some(err.to_string())),
        }
        revision += 1;
    }

    /// Load a settings blob into the store (wholesale replace).
    pub fn load_settings(&self, bytes: &[u8]) -> Result<(), String> {
        let mut revision = self.revision;
        let result = self
            .session
            .borrow_mut()
            .load_settings(bytes)
            .map_err(|err| err.to_string());
        revision += 1;
        result
    }

    pub fn save_settings(&self) -> Result<Vec<u8>, String> {
        self.session
            .borrow()
            .save_settings()
            .map_err(|err| err.to_string())
    }

    /// Run one full render pass against the current widget state. Reads the
    /// reactive inputs, so a component calling this re-renders whenever any
    /// of them change.
    pub fn render(&self) -> Result<RenderOutcome, String> {
        let _ = (self.revision)();
        let options = (self.options)();
        let overrides = (self.overrides)();
        self.session
            .borrow_mut()
            .render(&overrides, &options)
            .map_err(|err| err.to_string())
    }

    /// Effective style a widget should display for one series right now.
    pub fn effective_style(&self, series_name: &str) -> SeriesStyle {
        let overrides = (self.overrides)();
        let none = StyleOverrides::default();
        let session = self.session.borrow();
        resolve(
            series_name,
            overrides.get(series_name).unwrap_or(&none),
            session.store().get_defaults(series_name),
        )
    }

    /// Apply one field edit to a series override.
    pub fn edit_override(&self, series_name: &str, edit: impl FnOnce(&mut StyleOverrides)) {
        let mut overrides = self.overrides;
        overrides.with_mut(|map| edit(map.entry(series_name.to_string()).or_default()));
    }

    pub fn edit_options(&self, edit: impl FnOnce(&mut PlotOptions)) {
        let mut options = self.options;
        options.with_mut(edit);
    }
}

/// The assembled plotter page: provides the shared state and lays out the
/// sidebar panels beside the live preview.
#[component]
pub fn PlotterWorkspace() -> Element {
    let session = use_hook(|| Rc::new(RefCell::new(PlotterSession::new())));
    let revision = use_signal(|| 0u64);
    let options = use_signal(PlotOptions::default);
    let overrides = use_signal(HashMap::<String, StyleOverrides>::new);
    let upload_error = use_signal(|| None::<String>);

    let state = PlotterState {
        session,
        revision,
        options,
        overrides,
        upload_error,
    };
    use_context_provider(|| state);

    rsx! {
        div { class: "plotter__panels",
            div { class: "plotter__sidebar",
                UploadPanel {}
                GlobalControlsPanel {}
                SeriesControlsPanel {}
                ExportPanel {}
            }
            div { class: "plotter__main",
                ChartPreview {}
            }
        }
    }
}
