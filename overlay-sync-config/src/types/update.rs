use super::section::{Section, SectionFields};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A pending update: the sections being changed and, within each, only the
/// fields being changed.
///
/// Absent and empty sections are omitted from the JSON body, so the server
/// leaves them untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayUpdate {
    #[serde(default, skip_serializing_if = "is_absent")]
    pub font: Option<SectionFields>,
    #[serde(default, skip_serializing_if = "is_absent")]
    pub colors: Option<SectionFields>,
    #[serde(default, skip_serializing_if = "is_absent")]
    pub animation: Option<SectionFields>,
    #[serde(default, skip_serializing_if = "is_absent")]
    pub layout: Option<SectionFields>,
}

fn is_absent(fields: &Option<SectionFields>) -> bool {
    fields.as_ref().is_none_or(|f| f.is_empty())
}

impl OverlayUpdate {
    /// An update touching a single section.
    pub fn single(section: Section, fields: SectionFields) -> Self {
        let mut update = Self::default();
        update.set(section, fields);
        update
    }

    /// Replace the field set of `section`.
    pub fn set(&mut self, section: Section, fields: SectionFields) {
        *self.slot_mut(section) = Some(fields);
    }

    /// Builder form of [`set`](Self::set) that skips `None`.
    pub fn with(mut self, section: Section, fields: Option<SectionFields>) -> Self {
        if let Some(fields) = fields {
            self.set(section, fields);
        }
        self
    }

    /// Fields for `section`, if the section carries any.
    pub fn section(&self, section: Section) -> Option<&SectionFields> {
        let slot = match section {
            Section::Font => &self.font,
            Section::Colors => &self.colors,
            Section::Animation => &self.animation,
            Section::Layout => &self.layout,
        };
        slot.as_ref().filter(|f| !f.is_empty())
    }

    fn slot_mut(&mut self, section: Section) -> &mut Option<SectionFields> {
        match section {
            Section::Font => &mut self.font,
            Section::Colors => &mut self.colors,
            Section::Animation => &mut self.animation,
            Section::Layout => &mut self.layout,
        }
    }

    /// True when no section carries a field; such an update is never sent.
    pub fn is_empty(&self) -> bool {
        Section::all().iter().all(|s| self.section(*s).is_none())
    }

    /// Sections carrying at least one field.
    pub fn sections(&self) -> Vec<Section> {
        Section::all()
            .iter()
            .copied()
            .filter(|s| self.section(*s).is_some())
            .collect()
    }
}

/// Full overlay configuration as reported by the server.
///
/// Section values are kept as JSON so that whatever the server stores
/// (including non-string values written by other tools) round-trips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub font: Map<String, Value>,
    #[serde(default)]
    pub colors: Map<String, Value>,
    #[serde(default)]
    pub animation: Map<String, Value>,
    #[serde(default)]
    pub layout: Map<String, Value>,
    /// Any other top-level keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl OverlayConfig {
    pub fn section(&self, section: Section) -> &Map<String, Value> {
        match section {
            Section::Font => &self.font,
            Section::Colors => &self.colors,
            Section::Animation => &self.animation,
            Section::Layout => &self.layout,
        }
    }

    /// String value of `key` in `section`, if present and a string.
    pub fn field_str(&self, section: Section, key: &str) -> Option<&str> {
        self.section(section).get(key).and_then(Value::as_str)
    }
}
