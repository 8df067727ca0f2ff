//! Widget layout engine for the personal analytics dashboard.
//!
//! Users compose metric cards and charts onto a fixed 12-column grid. This
//! crate owns everything about *where* those widgets sit: the widget catalog,
//! the layout model and its invariants, first-fit placement of new widgets,
//! the layout store with asynchronous persistence, and the drag controller
//! that turns pointer input into committed layout changes.
//!
//! Rendering widget contents is not part of this crate.

/// Configuration loading, schema and XDG path resolution.
pub mod config;

/// Pointer-driven drag and reorder state machine.
pub mod drag;

/// Layout model, placement engine and default presets.
pub mod layout;

/// Logging initialization.
pub mod logging;

/// Persistence gateway trait, blob format and gateway implementations.
pub mod persistence;

/// In-memory layout store with fire-and-forget persistence.
pub mod store;

/// Widget catalog: static metadata for every widget the dashboard offers.
pub mod widgets;

pub use layout::{GridRect, Layout, LayoutViolation, WidgetInstance};
pub use store::{AddOutcome, LayoutEvent, LayoutStore, StoreOptions};
pub use widgets::{WidgetCatalog, WidgetCategory, WidgetDefinition};

/// Total width of the dashboard grid in columns. Rows are unbounded.
pub const GRID_COLUMNS: u32 = 12;

/// Errors returned by layout operations.
///
/// Persistence failures never surface here; the store recovers from them
/// locally and reports them as [`LayoutEvent`]s instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The widget id is not present in the catalog.
    #[error("Unknown widget: {0}")]
    UnknownWidget(String),

    /// A replacement layout violates a layout invariant.
    #[error("Invalid layout: {0}")]
    InvalidLayout(#[from] LayoutViolation),
}
