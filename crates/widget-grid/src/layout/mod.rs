//! Layout system for the dashboard.
//!
//! Holds the layout model and its invariants, the first-fit placement engine,
//! normalization of stored layouts, and the catalog's default preset.

mod model;
pub mod normalize;
pub mod placement;
pub mod presets;

pub use model::{GridRect, Layout, LayoutViolation, WidgetInstance};
pub use presets::{LayoutPreset, PresetEntry};
