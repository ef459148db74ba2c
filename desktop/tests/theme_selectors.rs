#![cfg(test)]
/*!
Theme selector lint for the desktop build.

Purpose:
- Ensure that critical CSS selectors required by the desktop UI (especially the
  plotter panels) remain present in the unified shared theme:
  ui/assets/theme/main.css
- Fail fast if a refactor accidentally drops or renames core classes, preventing a
  silent styling regression in packaged (embedded) desktop builds.

How it works:
- We compile‑time embed the unified theme using `include_str!` pointing to the shared
  `ui/` location (mirrors the constant in `desktop/src/main.rs`).
- We assert presence of a curated set of selectors / tokens.
- If you intentionally rename or remove a selector:
    1. Update the Dioxus component markup.
    2. Adjust this test's REQUIRED_SELECTORS accordingly.

Why not parse CSS properly?
- A lightweight substring presence check is sufficient as an early warning.
- Keeping zero extra dependencies avoids increasing compile times.
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

/// Core selectors / tokens that must exist in the shared theme for desktop.
const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    // Buttons & shared UI
    ".button {",
    ".button--primary",
    // Plotter layout & cards
    ".plotter__panels",
    ".plotter__sidebar",
    ".plotter-card",
    ".plotter-card__header",
    ".plotter-card__meta",
    ".plotter-card__placeholder",
    ".plotter-card__error",
    // Controls
    ".plotter-field",
    ".plotter-field--inline",
    ".plotter-field-group",
    // Upload list
    ".plotter-upload__files",
    ".plotter-upload__rows",
    // Series styling entries
    ".plotter-series__entry",
    ".plotter-series__name",
    // Preview & export
    ".plotter-preview__chart",
    ".plotter-export__actions",
    // Media query token (sanity check responsive block exists)
    "@media (max-width: 960px)",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let mut missing = Vec::new();
    for sel in REQUIRED_SELECTORS {
        if !THEME_CSS.contains(sel) {
            missing.push(*sel);
        }
    }

    if !missing.is_empty() {
        panic!(
            "Missing {} required CSS selectors/tokens in unified theme:\n{}",
            missing.len(),
            missing.join("\n")
        );
    }
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 2_000,
        "Embedded theme appears unexpectedly small ({} non-whitespace chars) – \
         did the file get truncated or path change?",
        non_ws_len
    );
}

#[test]
fn status_feedback_classes_are_paired() {
    // Export feedback relies on both status modifiers existing together.
    let has_success = THEME_CSS.contains(".plotter-card__meta--success");
    let has_error = THEME_CSS.contains(".plotter-card__meta--error");
    assert!(
        has_success && has_error,
        "Export status sub‑selectors missing (success: {has_success}, error: {has_error})"
    );
}
