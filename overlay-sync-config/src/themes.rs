//! Built-in overlay themes applied as one batch update.

use crate::types::{OverlayUpdate, Section, SectionFields};

/// A named set of values for all four style sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayTheme {
    pub name: &'static str,
    pub description: &'static str,
    pub font: SectionFields,
    pub colors: SectionFields,
    pub animation: SectionFields,
    pub layout: SectionFields,
}

impl OverlayTheme {
    /// The batch update that applies this theme.
    pub fn to_update(&self) -> OverlayUpdate {
        OverlayUpdate::default()
            .with(Section::Font, Some(self.font.clone()))
            .with(Section::Colors, Some(self.colors.clone()))
            .with(Section::Animation, Some(self.animation.clone()))
            .with(Section::Layout, Some(self.layout.clone()))
    }
}

fn fields(pairs: &[(&str, &str)]) -> SectionFields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

const DEFAULT_EASING: &str = "cubic-bezier(0.25, 0.46, 0.45, 0.94)";

fn classic() -> OverlayTheme {
    OverlayTheme {
        name: "classic",
        description: "Server defaults: white text, black stroke",
        font: fields(&[("family", "SEA"), ("size", "64px"), ("weight", "normal")]),
        colors: fields(&[
            ("text", "white"),
            ("shadow", "rgba(0,0,0,0.5)"),
            ("stroke", "black"),
        ]),
        animation: fields(&[("duration", "1s"), ("easing", DEFAULT_EASING)]),
        layout: fields(&[("paddingLeft", "20px"), ("gap", "0")]),
    }
}

fn crimson() -> OverlayTheme {
    OverlayTheme {
        name: "crimson",
        description: "Bright red text with a red glow",
        font: fields(&[("family", "Arial"), ("size", "72px"), ("weight", "bold")]),
        colors: fields(&[
            ("text", "#FF0000"),
            ("shadow", "rgba(255,0,0,0.8)"),
            ("stroke", "#000000"),
        ]),
        animation: fields(&[("duration", "1s"), ("easing", DEFAULT_EASING)]),
        layout: fields(&[("paddingLeft", "20px"), ("gap", "0")]),
    }
}

fn neon() -> OverlayTheme {
    OverlayTheme {
        name: "neon",
        description: "Cyan neon with a blue outline",
        font: fields(&[("family", "Arial"), ("size", "64px"), ("weight", "bold")]),
        colors: fields(&[
            ("text", "#00FFFF"),
            ("shadow", "rgba(0,255,255,0.8)"),
            ("stroke", "#0000FF"),
        ]),
        animation: fields(&[("duration", "500ms"), ("easing", "ease-in-out")]),
        layout: fields(&[("paddingLeft", "30px"), ("gap", "5px")]),
    }
}

fn matrix() -> OverlayTheme {
    OverlayTheme {
        name: "matrix",
        description: "Green monospace on a dark outline",
        font: fields(&[
            ("family", "Courier New"),
            ("size", "56px"),
            ("weight", "normal"),
        ]),
        colors: fields(&[
            ("text", "#00FF00"),
            ("shadow", "rgba(0,255,0,0.8)"),
            ("stroke", "#003300"),
        ]),
        animation: fields(&[("duration", "2s"), ("easing", "linear")]),
        layout: fields(&[("paddingLeft", "20px"), ("gap", "0")]),
    }
}

/// All built-in themes; the first one matches the server's defaults.
pub fn builtin_themes() -> Vec<OverlayTheme> {
    vec![classic(), crimson(), neon(), matrix()]
}

/// Look up a built-in theme by name (case-insensitive).
pub fn builtin_theme(name: &str) -> Option<OverlayTheme> {
    builtin_themes()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
}

/// The theme that restores the server's default look.
pub fn default_theme() -> OverlayTheme {
    classic()
}
