//! Default layout preset.
//!
//! A preset lists widget ids with their grid origins; spans come from the
//! catalog's default sizes. The catalog owns one preset, used both for new
//! dashboards and for "reset to default".

use crate::layout::model::{Layout, WidgetInstance};
use crate::widgets::WidgetCatalog;

/// One widget origin in a preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetEntry {
    /// Catalog id of the widget.
    pub id: String,
    pub x: u32,
    pub y: u32,
}

/// Named, ordered list of widget origins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPreset {
    /// Human-readable name of the preset.
    pub name: String,
    /// Widget origins in layout order.
    pub entries: Vec<PresetEntry>,
}

impl LayoutPreset {
    /// Creates a preset from `(id, x, y)` triples.
    pub fn new(name: &str, entries: &[(&str, u32, u32)]) -> Self {
        Self {
            name: name.to_string(),
            entries: entries
                .iter()
                .map(|&(id, x, y)| PresetEntry {
                    id: id.to_string(),
                    x,
                    y,
                })
                .collect(),
        }
    }

    /// A preset with no widgets.
    pub fn empty() -> Self {
        Self::new("empty", &[])
    }

    /// The dashboard's standard starting arrangement: four metric cards
    /// across the top, the equity curve beside daily P&L, recent trades
    /// underneath.
    pub fn builtin() -> Self {
        Self::new(
            "default",
            &[
                ("total-pnl", 0, 0),
                ("win-rate", 3, 0),
                ("profit-factor", 6, 0),
                ("avg-win-loss", 9, 0),
                ("equity-curve", 0, 2),
                ("daily-pnl", 8, 2),
                ("recent-trades", 0, 6),
            ],
        )
    }

    /// Builds the layout, taking spans from the catalog.
    ///
    /// Entries whose id is missing from the catalog are skipped; catalog
    /// construction rejects such presets, so this only matters for presets
    /// built against a different catalog.
    pub fn build(&self, catalog: &WidgetCatalog) -> Layout {
        let mut layout = Layout::new();
        for entry in &self.entries {
            match catalog.lookup(&entry.id) {
                Some(definition) => {
                    layout.push(WidgetInstance::from_definition(definition, entry.x, entry.y))
                }
                None => tracing::warn!("Preset '{}' references unknown widget {}", self.name, entry.id),
            }
        }
        layout
    }
}
