use super::section::{SectionFields, put};
use crate::error::ValidationError;
use crate::validation::validate_color;

/// Partial update of the `colors` section. Every recognised field must be a
/// valid CSS color (see [`crate::validation::is_valid_color`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorsUpdate {
    pub text: Option<String>,
    pub shadow: Option<String>,
    pub stroke: Option<String>,
    pub extra: SectionFields,
}

impl ColorsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, color: impl Into<String>) -> Self {
        self.text = Some(color.into());
        self
    }

    pub fn shadow(mut self, color: impl Into<String>) -> Self {
        self.shadow = Some(color.into());
        self
    }

    pub fn stroke(mut self, color: impl Into<String>) -> Self {
        self.stroke = Some(color.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Validate and flatten into the wire field set.
    pub fn into_fields(self) -> Result<SectionFields, ValidationError> {
        let mut fields = self.extra;
        put(&mut fields, "text", self.text);
        put(&mut fields, "shadow", self.shadow);
        put(&mut fields, "stroke", self.stroke);

        for key in ["text", "shadow", "stroke"] {
            if let Some(value) = fields.get(key) {
                validate_color(key, value)?;
            }
        }
        Ok(fields)
    }
}
