//! The settings store: the one component here with a lifecycle.
//!
//! A `SettingsStore` maps series names to their last effective styles. It is
//! created empty at session start, replaced wholesale by loading a blob,
//! grown by `record` during render passes, and serialized verbatim by
//! `save`. The blob is schema-checked JSON; nothing arbitrary is ever
//! deserialized. Round-trip law: `load(save())` is the identity, key order
//! included.

use indexmap::IndexMap;
use serde::Deserialize;

use super::error::{PlotError, PlotResult};
use super::style::{clamp_line_width, normalize_color, LineStyle, SeriesStyle};

pub type SettingsMap = IndexMap<String, SeriesStyle>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsStore {
    map: SettingsMap,
}

/// Wire shape of one style entry. All four fields are required; unknown
/// extra fields are ignored so older blobs with annotations still load.
#[derive(Debug, Deserialize)]
struct StyleBlobEntry {
    color: String,
    line_style: LineStyle,
    line_width: f64,
    label: String,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: SettingsMap) -> Self {
        Self { map }
    }

    /// Deserialize a settings blob and replace the in-memory map wholesale.
    ///
    /// Any shape violation (not a string→style mapping, missing style field,
    /// unknown line style, invalid hex color) fails with `CorruptSettings`
    /// and leaves the current map untouched. Out-of-range line widths clamp
    /// instead of failing; that invariant belongs to the style itself.
    pub fn load(&mut self, blob: &[u8]) -> PlotResult<()> {
        let raw: IndexMap<String, StyleBlobEntry> = serde_json::from_slice(blob)
            .map_err(|err| PlotError::CorruptSettings(err.to_string()))?;

        let mut map = SettingsMap::with_capacity(raw.len());
        for (series, entry) in raw {
            let color = normalize_color(&entry.color).ok_or_else(|| {
                PlotError::CorruptSettings(format!(
                    "series `{series}` has an invalid color `{}`",
                    entry.color
                ))
            })?;
            map.insert(
                series.clone(),
                SeriesStyle {
                    color,
                    line_style: entry.line_style,
                    line_width: clamp_line_width(entry.line_width),
                    label: entry.label,
                }
                .sanitized(&series),
            );
        }

        self.map = map;
        Ok(())
    }

    /// Stored style for a series, if any. `None` tells the resolver to use
    /// the hard-coded defaults.
    pub fn get_defaults(&self, series_name: &str) -> Option<&SeriesStyle> {
        self.map.get(series_name)
    }

    /// Upsert the effective style for a series. Series absent from the
    /// current upload set are neither removed nor touched; the map only
    /// grows, or is replaced wholesale by `load`.
    pub fn record(&mut self, series_name: &str, style: SeriesStyle) {
        self.map.insert(series_name.to_string(), style);
    }

    /// Serialize the current map verbatim.
    pub fn save(&self) -> PlotResult<Vec<u8>> {
        serde_json::to_vec_pretty(&self.map)
            .map_err(|err| PlotError::CorruptSettings(err.to_string()))
    }

    pub fn snapshot(&self) -> SettingsMap {
        self.map.clone()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::DEFAULT_LINE_WIDTH;

    fn sample_store() -> SettingsStore {
        let mut store = SettingsStore::new();
        store.record(
            "a.json",
            SeriesStyle {
                color: "#112233".into(),
                line_style: LineStyle::Dashed,
                line_width: 2.5,
                label: "run a".into(),
            },
        );
        store.record(
            "b.json",
            SeriesStyle {
                color: "#00f900".into(),
                line_style: LineStyle::Dotted,
                line_width: 0.5,
                label: "b.json".into(),
            },
        );
        store
    }

    #[test]
    fn load_of_save_is_identity() {
        let store = sample_store();
        let blob = store.save().unwrap();

        let mut reloaded = SettingsStore::new();
        reloaded.load(&blob).unwrap();

        assert_eq!(reloaded, store);
        // Key order is part of the contract.
        let keys: Vec<_> = reloaded.snapshot().keys().cloned().collect();
        assert_eq!(keys, vec!["a.json".to_string(), "b.json".to_string()]);
    }

    #[test]
    fn load_replaces_wholesale() {
        let mut store = sample_store();
        let only_c = br##"{
            "c.json": {"color": "#abcdef", "line_style": "solid", "line_width": 1.0, "label": "c"}
        }"##;
        store.load(only_c).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get_defaults("a.json").is_none());
        assert!(store.get_defaults("c.json").is_some());
    }

    #[test]
    fn record_never_removes_other_series() {
        let mut store = sample_store();
        store.record("c.json", SeriesStyle::fallback("c.json"));
        assert_eq!(store.len(), 3);
        assert!(store.get_defaults("a.json").is_some());
    }

    #[test]
    fn load_rejects_non_mapping_blobs() {
        let mut store = SettingsStore::new();
        let err = store.load(br##"["not", "a", "mapping"]"##).unwrap_err();
        assert!(matches!(err, PlotError::CorruptSettings(_)));
    }

    #[test]
    fn load_rejects_missing_style_field() {
        let mut store = SettingsStore::new();
        let blob = br##"{"a.json": {"color": "#112233", "line_style": "solid", "label": "a"}}"##;
        let err = store.load(blob).unwrap_err();
        assert!(matches!(err, PlotError::CorruptSettings(_)));
    }

    #[test]
    fn load_rejects_unknown_line_style() {
        let mut store = SettingsStore::new();
        let blob =
            br##"{"a.json": {"color": "#112233", "line_style": "wavy", "line_width": 1.0, "label": "a"}}"##;
        let err = store.load(blob).unwrap_err();
        assert!(matches!(err, PlotError::CorruptSettings(_)));
    }

    #[test]
    fn load_rejects_invalid_hex_color() {
        let mut store = SettingsStore::new();
        let blob =
            br##"{"a.json": {"color": "green", "line_style": "solid", "line_width": 1.0, "label": "a"}}"##;
        let err = store.load(blob).unwrap_err();
        assert!(matches!(err, PlotError::CorruptSettings(_)));
    }

    #[test]
    fn load_clamps_out_of_range_width_and_fills_empty_label() {
        let mut store = SettingsStore::new();
        let blob =
            br##"{"a.json": {"color": "#112233", "line_style": "solid", "line_width": 99.0, "label": "  "}}"##;
        store.load(blob).unwrap();
        let style = store.get_defaults("a.json").unwrap();
        assert_eq!(style.line_width, 5.0);
        assert_eq!(style.label, "a.json");
    }

    #[test]
    fn failed_load_leaves_map_untouched() {
        let mut store = sample_store();
        let before = store.snapshot();
        assert!(store.load(b"garbage").is_err());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn width_clamp_handles_nan() {
        assert_eq!(clamp_line_width(f64::NAN), DEFAULT_LINE_WIDTH);
    }
}
