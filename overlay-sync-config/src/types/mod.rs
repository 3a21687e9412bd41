//! Overlay style types.
//!
//! Grouped by section:
//! - [`section`]: `Section`, `SectionFields`
//! - [`font`], [`colors`], [`animation`], [`layout`]: per-section partial updates
//! - [`update`]: `OverlayUpdate` (outgoing batch), `OverlayConfig` (server view)
//! - [`integration`]: `UpdateCheckFrequency`

mod animation;
mod colors;
mod font;
mod integration;
mod layout;
mod section;
mod update;

pub use animation::AnimationUpdate;
pub use colors::ColorsUpdate;
pub use font::FontUpdate;
pub use integration::UpdateCheckFrequency;
pub use layout::LayoutUpdate;
pub use section::{Section, SectionFields};
pub use update::{OverlayConfig, OverlayUpdate};
