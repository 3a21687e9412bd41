use super::section::{SectionFields, put};
use crate::error::ValidationError;
use crate::validation::{validate_font_size, validate_font_weight};

/// Partial update of the `font` section.
///
/// Only the fields that are set end up in the outgoing request; the server
/// keeps its current value for the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontUpdate {
    /// Font family name (e.g. `Arial`, `Courier New`). Not validated.
    pub family: Option<String>,
    /// CSS size with unit (e.g. `64px`, `2em`).
    pub size: Option<String>,
    /// CSS weight keyword or `100`..`900`.
    pub weight: Option<String>,
    /// Unrecognised keys, passed through as-is.
    pub extra: SectionFields,
}

impl FontUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Validate and flatten into the wire field set.
    ///
    /// Typed fields take precedence over `extra` entries with the same key.
    /// Recognised keys are validated wherever they came from.
    pub fn into_fields(self) -> Result<SectionFields, ValidationError> {
        let mut fields = self.extra;
        put(&mut fields, "family", self.family);
        put(&mut fields, "size", self.size);
        put(&mut fields, "weight", self.weight);

        if let Some(size) = fields.get("size") {
            validate_font_size(size)?;
        }
        if let Some(weight) = fields.get("weight") {
            validate_font_weight(weight)?;
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_set_fields_are_emitted() {
        let fields = FontUpdate::new().family("Arial").into_fields().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("family").map(String::as_str), Some("Arial"));
    }

    #[test]
    fn test_empty_update_yields_empty_fields() {
        assert!(FontUpdate::new().into_fields().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_size_rejected() {
        let err = FontUpdate::new().size("48").into_fields().unwrap_err();
        assert_eq!(err, ValidationError::FontSize("48".to_string()));
    }

    #[test]
    fn test_extra_size_is_still_validated() {
        let result = FontUpdate::new().with_extra("size", "huge").into_fields();
        assert!(result.is_err());
    }

    #[test]
    fn test_extra_unknown_key_passes_through() {
        let fields = FontUpdate::new()
            .weight("bold")
            .with_extra("letterSpacing", "2px")
            .into_fields()
            .unwrap();
        assert_eq!(
            fields.get("letterSpacing").map(String::as_str),
            Some("2px")
        );
        assert_eq!(fields.get("weight").map(String::as_str), Some("bold"));
    }
}
