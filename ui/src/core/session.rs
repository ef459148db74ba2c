//! Session lifecycle: `Empty → FilesLoaded → Rendered`, with settings
//! loadable from either of the first two states.
//!
//! A `PlotterSession` owns the uploaded series and the settings store and
//! runs the whole render pass. Any error aborts the pass with a single
//! message and no partial chart; the session stays usable for the next
//! interaction. There is exactly one render in flight per session, so no
//! further access discipline is needed.

use std::collections::HashMap;

use super::decode::{self, Row};
use super::error::{PlotError, PlotResult};
use super::plot::{compose, PlotOptions, PlotSeries, PlotSpec};
use super::render::render_svg;
use super::settings::SettingsStore;
use super::style::{resolve, SeriesStyle, StyleOverrides};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Empty,
    /// Settings seeded before any upload; defaults apply to whatever
    /// arrives later.
    SettingsLoaded,
    FilesLoaded,
    Rendered,
}

/// One uploaded file, decoded. The name doubles as the stable series key.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub name: String,
    pub rows: Vec<Row>,
}

/// Result of a successful render pass: the composed description plus its
/// SVG rendition for the preview.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub spec: PlotSpec,
    pub svg: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlotterSession {
    phase: SessionPhase,
    series: Vec<LoadedSeries>,
    store: SettingsStore,
}

impl PlotterSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn series(&self) -> &[LoadedSeries] {
        &self.series
    }

    pub fn series_names(&self) -> Vec<String> {
        self.series.iter().map(|series| series.name.clone()).collect()
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn has_files(&self) -> bool {
        !self.series.is_empty()
    }

    /// Replace the upload set with freshly decoded files, sequentially, in
    /// upload order. All-or-nothing: any decode failure (or a duplicate
    /// series name) leaves the previous upload set in place.
    pub fn ingest_files(&mut self, files: Vec<(String, Vec<u8>)>) -> PlotResult<()> {
        let mut loaded = Vec::with_capacity(files.len());
        for (name, bytes) in files {
            if loaded.iter().any(|series: &LoadedSeries| series.name == name) {
                return Err(PlotError::MalformedInput(format!(
                    "duplicate series name `{name}` in the upload set"
                )));
            }
            let rows = decode::decode(&name, &bytes)?;
            loaded.push(LoadedSeries { name, rows });
        }

        self.series = loaded;
        self.phase = match (self.series.is_empty(), self.store.is_empty()) {
            (true, true) => SessionPhase::Empty,
            (true, false) => SessionPhase::SettingsLoaded,
            (false, _) => SessionPhase::FilesLoaded,
        };
        Ok(())
    }

    /// Load a settings blob, replacing stored defaults wholesale. Reachable
    /// from any state; with files already loaded the phase is unchanged and
    /// the new defaults apply from the next render pass.
    pub fn load_settings(&mut self, blob: &[u8]) -> PlotResult<()> {
        self.store.load(blob)?;
        if self.phase == SessionPhase::Empty {
            self.phase = SessionPhase::SettingsLoaded;
        }
        Ok(())
    }

    pub fn save_settings(&self) -> PlotResult<Vec<u8>> {
        self.store.save()
    }

    /// One full synchronous render pass.
    ///
    /// Styles resolve against the store's state from *before* this pass
    /// (override > stored default > hard-coded default, per field), then
    /// every resolved style is recorded so a following `save` carries each
    /// series of this pass. Re-rendering on a control change is idempotent.
    pub fn render(
        &mut self,
        overrides: &HashMap<String, StyleOverrides>,
        options: &PlotOptions,
    ) -> PlotResult<RenderOutcome> {
        if self.series.is_empty() {
            return Err(PlotError::MalformedInput(
                "no files uploaded; nothing to plot".into(),
            ));
        }

        let none = StyleOverrides::default();
        let resolved: Vec<(String, SeriesStyle)> = self
            .series
            .iter()
            .map(|series| {
                let series_overrides = overrides.get(&series.name).unwrap_or(&none);
                let style = resolve(
                    &series.name,
                    series_overrides,
                    self.store.get_defaults(&series.name),
                );
                (series.name.clone(), style)
            })
            .collect();

        for (name, style) in &resolved {
            self.store.record(name, style.clone());
        }

        let plot_series = self
            .series
            .iter()
            .zip(resolved)
            .map(|(series, (_, style))| PlotSeries {
                name: series.name.clone(),
                rows: series.rows.clone(),
                style,
            })
            .collect();

        let spec = compose(plot_series, options);
        let svg = render_svg(&spec);
        self.phase = SessionPhase::Rendered;
        Ok(RenderOutcome { spec, svg })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::{LineStyle, DEFAULT_COLOR, DEFAULT_LINE_WIDTH};

    const A_JSON: &[u8] = br##"[["t0",1,0.5],["t1",2,0.3]]"##;
    const B_JSON: &[u8] = br##"[["t0",1,0.9]]"##;

    fn upload(session: &mut PlotterSession) {
        session
            .ingest_files(vec![
                ("a.json".into(), A_JSON.to_vec()),
                ("b.json".into(), B_JSON.to_vec()),
            ])
            .unwrap();
    }

    #[test]
    fn phases_walk_empty_files_rendered() {
        let mut session = PlotterSession::new();
        assert_eq!(session.phase(), SessionPhase::Empty);

        upload(&mut session);
        assert_eq!(session.phase(), SessionPhase::FilesLoaded);

        session
            .render(&HashMap::new(), &PlotOptions::default())
            .unwrap();
        assert_eq!(session.phase(), SessionPhase::Rendered);

        // Control change: rendering again is idempotent.
        let again = session
            .render(&HashMap::new(), &PlotOptions::default())
            .unwrap();
        assert_eq!(session.phase(), SessionPhase::Rendered);
        assert_eq!(again.spec.series.len(), 2);
    }

    #[test]
    fn settings_loaded_is_reachable_from_empty() {
        let mut session = PlotterSession::new();
        let blob = br##"{"a.json": {"color": "#ff0000", "line_style": "dashed", "line_width": 2.0, "label": "warmup"}}"##;
        session.load_settings(blob).unwrap();
        assert_eq!(session.phase(), SessionPhase::SettingsLoaded);

        // Seeded defaults apply to the upload that follows.
        upload(&mut session);
        let outcome = session
            .render(&HashMap::new(), &PlotOptions::default())
            .unwrap();
        assert_eq!(outcome.spec.series[0].style.label, "warmup");
        assert_eq!(outcome.spec.series[0].style.color, "#ff0000");
    }

    #[test]
    fn render_produces_ordered_series_and_legend() {
        let mut session = PlotterSession::new();
        upload(&mut session);
        let outcome = session
            .render(&HashMap::new(), &PlotOptions::default())
            .unwrap();
        assert_eq!(outcome.spec.series.len(), 2);
        assert_eq!(outcome.spec.series[0].name, "a.json");
        assert_eq!(outcome.spec.series[1].name, "b.json");
        assert_eq!(outcome.spec.legend().len(), 2);
    }

    #[test]
    fn render_records_every_series_for_the_next_save() {
        let mut session = PlotterSession::new();
        upload(&mut session);
        session
            .render(&HashMap::new(), &PlotOptions::default())
            .unwrap();

        let blob = session.save_settings().unwrap();
        let text = String::from_utf8(blob).unwrap();
        assert!(text.contains("a.json"));
        assert!(text.contains("b.json"));
        assert!(text.contains(DEFAULT_COLOR));
    }

    #[test]
    fn recorded_styles_do_not_shadow_fresh_overrides() {
        let mut session = PlotterSession::new();
        upload(&mut session);

        let mut overrides = HashMap::new();
        overrides.insert(
            "a.json".to_string(),
            StyleOverrides {
                line_style: Some(LineStyle::Dotted),
                ..Default::default()
            },
        );
        let first = session.render(&overrides, &PlotOptions::default()).unwrap();
        assert_eq!(first.spec.series[0].style.line_style, LineStyle::Dotted);

        // Dropping the override falls back to the recorded default from the
        // previous pass, not the hard-coded one.
        let second = session
            .render(&HashMap::new(), &PlotOptions::default())
            .unwrap();
        assert_eq!(second.spec.series[0].style.line_style, LineStyle::Dotted);
        assert_eq!(second.spec.series[0].style.line_width, DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn failed_ingestion_keeps_the_previous_upload_set() {
        let mut session = PlotterSession::new();
        upload(&mut session);

        let err = session
            .ingest_files(vec![(
                "broken.json".into(),
                br##"[{"timestamp": "t0", "iteration": 1}]"##.to_vec(),
            )])
            .unwrap_err();
        assert!(matches!(err, PlotError::MalformedInput(_)));

        // Session stays usable with the old files.
        assert_eq!(session.series_names(), vec!["a.json", "b.json"]);
        assert!(session
            .render(&HashMap::new(), &PlotOptions::default())
            .is_ok());
    }

    #[test]
    fn duplicate_upload_names_are_rejected() {
        let mut session = PlotterSession::new();
        let err = session
            .ingest_files(vec![
                ("a.json".into(), A_JSON.to_vec()),
                ("a.json".into(), B_JSON.to_vec()),
            ])
            .unwrap_err();
        assert!(matches!(err, PlotError::MalformedInput(_)));
        assert_eq!(session.phase(), SessionPhase::Empty);
    }

    #[test]
    fn render_without_files_is_an_error() {
        let mut session = PlotterSession::new();
        let err = session
            .render(&HashMap::new(), &PlotOptions::default())
            .unwrap_err();
        assert!(matches!(err, PlotError::MalformedInput(_)));
        assert_eq!(session.phase(), SessionPhase::Empty);
    }

    #[test]
    fn clearing_files_returns_to_settings_loaded_when_seeded() {
        let mut session = PlotterSession::new();
        let blob = br##"{"a.json": {"color": "#ff0000", "line_style": "solid", "line_width": 1.0, "label": "a"}}"##;
        session.load_settings(blob).unwrap();
        upload(&mut session);
        session.ingest_files(Vec::new()).unwrap();
        assert_eq!(session.phase(), SessionPhase::SettingsLoaded);
    }
}
