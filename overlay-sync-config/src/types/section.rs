use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field name to CSS value mapping for one section.
///
/// A `BTreeMap` keeps keys sorted, so two maps with the same content always
/// iterate (and serialize) in the same order.
pub type SectionFields = BTreeMap<String, String>;

/// One of the four style sections understood by the overlay server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Font,
    Colors,
    Animation,
    Layout,
}

impl Section {
    /// JSON key used for this section on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Font => "font",
            Section::Colors => "colors",
            Section::Animation => "animation",
            Section::Layout => "layout",
        }
    }

    /// All sections, in wire order.
    pub fn all() -> &'static [Section] {
        &[
            Section::Font,
            Section::Colors,
            Section::Animation,
            Section::Layout,
        ]
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insert `value` under `key` when present.
pub(crate) fn put(fields: &mut SectionFields, key: &str, value: Option<String>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), value);
    }
}
