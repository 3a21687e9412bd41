use super::section::{SectionFields, put};
use crate::error::ValidationError;

/// Partial update of the `layout` section. Values are opaque strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutUpdate {
    /// Left padding, sent as `paddingLeft`.
    pub padding_left: Option<String>,
    pub gap: Option<String>,
    pub extra: SectionFields,
}

impl LayoutUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn padding_left(mut self, padding: impl Into<String>) -> Self {
        self.padding_left = Some(padding.into());
        self
    }

    pub fn gap(mut self, gap: impl Into<String>) -> Self {
        self.gap = Some(gap.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Layout has no format rules; this never fails but keeps the same shape
    /// as the other sections.
    pub fn into_fields(self) -> Result<SectionFields, ValidationError> {
        let mut fields = self.extra;
        put(&mut fields, "paddingLeft", self.padding_left);
        put(&mut fields, "gap", self.gap);
        Ok(fields)
    }
}
