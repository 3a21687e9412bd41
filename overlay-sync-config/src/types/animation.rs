use super::section::{SectionFields, put};
use crate::error::ValidationError;
use crate::validation::validate_duration;

/// Partial update of the `animation` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationUpdate {
    /// Transition duration (`1s`, `500ms`).
    pub duration: Option<String>,
    /// Free-form CSS easing function or keyword; not validated.
    pub easing: Option<String>,
    pub extra: SectionFields,
}

impl AnimationUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn into_fields(self) -> Result<SectionFields, ValidationError> {
        let mut fields = self.extra;
        put(&mut fields, "duration", self.duration);
        put(&mut fields, "easing", self.easing);

        if let Some(duration) = fields.get("duration") {
            validate_duration(duration)?;
        }
        Ok(fields)
    }
}
