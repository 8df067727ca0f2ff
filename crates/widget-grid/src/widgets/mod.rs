//! Widget catalog for the dashboard.
//!
//! The catalog is an immutable registry mapping widget identifiers to their
//! display and sizing metadata. The layout engine consults it for default
//! spans when placing a widget and for validating ids on load; rendering
//! consults it for titles and categories.
//!
//! # Example
//!
//! ```
//! use widget_grid::widgets::WidgetCatalog;
//!
//! let catalog = WidgetCatalog::builtin();
//! let equity = catalog.lookup("equity-curve").expect("built-in widget");
//! assert_eq!(equity.title, "Equity Curve");
//! assert!(catalog.lookup("nonexistent").is_none());
//! ```

mod builtin;

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::layout::presets::LayoutPreset;
use crate::layout::Layout;
use crate::{LayoutError, LayoutViolation, GRID_COLUMNS};

/// Grouping used by the widget picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetCategory {
    /// Single-number metric cards.
    Metrics,
    /// Time series and distribution charts.
    Charts,
    /// Tabular trade listings.
    Tables,
    /// Generated commentary on trading behaviour.
    Insights,
    /// Streaks, badges and goals.
    Gamification,
}

impl fmt::Display for WidgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WidgetCategory::Metrics => "metrics",
            WidgetCategory::Charts => "charts",
            WidgetCategory::Tables => "tables",
            WidgetCategory::Insights => "insights",
            WidgetCategory::Gamification => "gamification",
        };
        f.pad(s)
    }
}

/// Catalog entry describing one kind of widget.
///
/// Widths and heights are in grid units. Definitions are never mutated once
/// they are part of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetDefinition {
    /// Unique identifier, also used as the instance id in layouts.
    pub id: String,
    /// Human-readable title shown in the widget header and notifications.
    pub title: String,
    /// Picker category.
    pub category: WidgetCategory,
    /// Column span used when the widget is first placed.
    pub default_width: u32,
    /// Row span used when the widget is first placed.
    pub default_height: u32,
    pub min_width: Option<u32>,
    pub min_height: Option<u32>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Whether the widget is only available on paid plans.
    pub is_premium: bool,
    /// Names of the data sources the widget reads.
    pub requires_data: Vec<String>,
}

impl WidgetDefinition {
    /// Creates a definition with no size bounds and no data requirements.
    pub fn new(
        id: &str,
        title: &str,
        category: WidgetCategory,
        default_width: u32,
        default_height: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            category,
            default_width,
            default_height,
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
            is_premium: false,
            requires_data: Vec::new(),
        }
    }

    /// Sets the minimum span.
    pub fn with_min(mut self, width: u32, height: u32) -> Self {
        self.min_width = Some(width);
        self.min_height = Some(height);
        self
    }

    /// Sets the maximum span.
    pub fn with_max(mut self, width: u32, height: u32) -> Self {
        self.max_width = Some(width);
        self.max_height = Some(height);
        self
    }

    /// Marks the widget as premium-only.
    pub fn premium(mut self) -> Self {
        self.is_premium = true;
        self
    }

    /// Sets the data sources the widget depends on.
    pub fn requires(mut self, sources: &[&str]) -> Self {
        self.requires_data = sources.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Checks that the definition can be placed on the grid.
    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidDefinition {
            id: self.id.clone(),
            reason,
        };
        if self.id.is_empty() {
            return Err(invalid("id must not be empty".to_string()));
        }
        if self.default_width == 0 || self.default_width > GRID_COLUMNS {
            return Err(invalid(format!(
                "default width {} must be between 1 and {}",
                self.default_width, GRID_COLUMNS
            )));
        }
        if self.default_height == 0 {
            return Err(invalid("default height must be at least 1".to_string()));
        }
        let bounds = [
            ("width", self.min_width, self.default_width, self.max_width),
            ("height", self.min_height, self.default_height, self.max_height),
        ];
        for (axis, min, default, max) in bounds {
            if min.is_some_and(|min| min > default) || max.is_some_and(|max| max < default) {
                return Err(invalid(format!(
                    "default {axis} {default} lies outside its min/max bounds"
                )));
            }
        }
        Ok(())
    }
}

/// Errors raised while building a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Two definitions share an id.
    #[error("Duplicate widget definition: {0}")]
    DuplicateId(String),

    /// A definition cannot be placed on the grid.
    #[error("Invalid widget definition '{id}': {reason}")]
    InvalidDefinition {
        /// Offending widget id.
        id: String,
        /// Why the definition was rejected.
        reason: String,
    },

    /// The default layout preset does not satisfy the layout invariants.
    #[error("Invalid default layout: {0}")]
    InvalidPreset(#[source] LayoutViolation),
}

/// Immutable registry of widget definitions plus the default layout preset.
///
/// Lookup is O(1); iteration follows registration order.
#[derive(Debug, Clone)]
pub struct WidgetCatalog {
    definitions: Vec<WidgetDefinition>,
    index: HashMap<String, usize>,
    default_preset: LayoutPreset,
}

impl WidgetCatalog {
    /// Builds a catalog from definitions and a default layout preset.
    ///
    /// Rejects invalid or duplicate definitions, and presets whose layout
    /// breaks an invariant (unknown ids, overlaps, out-of-grid spans).
    pub fn new(
        definitions: Vec<WidgetDefinition>,
        default_preset: LayoutPreset,
    ) -> Result<Self, CatalogError> {
        for definition in &definitions {
            definition.validate()?;
        }
        let catalog = Self::from_parts(definitions)?;
        if let Some(entry) = default_preset
            .entries
            .iter()
            .find(|entry| !catalog.contains(&entry.id))
        {
            return Err(CatalogError::InvalidPreset(LayoutViolation::UnknownWidget(
                entry.id.clone(),
            )));
        }
        let catalog = Self {
            default_preset,
            ..catalog
        };
        catalog
            .default_layout()
            .validate(&catalog)
            .map_err(CatalogError::InvalidPreset)?;
        Ok(catalog)
    }

    /// Returns the dashboard's standard widget set and default layout.
    pub fn builtin() -> Self {
        let definitions = builtin::definitions();
        let index = definitions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();
        Self {
            definitions,
            index,
            default_preset: LayoutPreset::builtin(),
        }
    }

    fn from_parts(definitions: Vec<WidgetDefinition>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (i, definition) in definitions.iter().enumerate() {
            if index.insert(definition.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(definition.id.clone()));
            }
        }
        Ok(Self {
            definitions,
            index,
            default_preset: LayoutPreset::empty(),
        })
    }

    /// Looks up a definition by id.
    pub fn lookup(&self, id: &str) -> Option<&WidgetDefinition> {
        self.index.get(id).map(|&i| &self.definitions[i])
    }

    /// Looks up a definition, failing with [`LayoutError::UnknownWidget`].
    pub fn require(&self, id: &str) -> Result<&WidgetDefinition, LayoutError> {
        self.lookup(id)
            .ok_or_else(|| LayoutError::UnknownWidget(id.to_string()))
    }

    /// Returns `true` if the id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.id.as_str())
    }

    /// All definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// The preset the dashboard starts from and resets to.
    pub fn default_preset(&self) -> &LayoutPreset {
        &self.default_preset
    }

    /// Builds a fresh copy of the default layout.
    pub fn default_layout(&self) -> Layout {
        self.default_preset.build(self)
    }
}

impl Default for WidgetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(id: &str) -> WidgetDefinition {
        WidgetDefinition::new(id, id, WidgetCategory::Metrics, 3, 2)
    }

    #[test]
    fn test_builtin_catalog_passes_validation() {
        let builtin = WidgetCatalog::builtin();
        let rebuilt = WidgetCatalog::new(
            builtin.iter().cloned().collect(),
            builtin.default_preset().clone(),
        );
        assert!(rebuilt.is_ok(), "built-in catalog invalid: {rebuilt:?}");
    }

    #[test]
    fn test_builtin_default_layout_is_valid_and_non_empty() {
        let catalog = WidgetCatalog::builtin();
        let layout = catalog.default_layout();
        assert!(!layout.is_empty());
        assert_eq!(layout.validate(&catalog), Ok(()));
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let catalog = WidgetCatalog::builtin();
        let def = catalog.lookup("total-pnl").expect("total-pnl is built in");
        assert_eq!(def.category, WidgetCategory::Metrics);
        assert!(catalog.lookup("").is_none());
        assert!(catalog.lookup("nonexistent").is_none());
    }

    #[test]
    fn test_require_unknown_returns_error() {
        let catalog = WidgetCatalog::builtin();
        assert_eq!(
            catalog.require("nope"),
            Err(LayoutError::UnknownWidget("nope".to_string()))
        );
    }

    #[test]
    fn test_ids_follow_registration_order() {
        let catalog = WidgetCatalog::new(
            vec![metric("b"), metric("a"), metric("c")],
            LayoutPreset::empty(),
        )
        .expect("valid catalog");
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_duplicate_definition_rejected() {
        let err = WidgetCatalog::new(vec![metric("a"), metric("a")], LayoutPreset::empty())
            .expect_err("duplicate ids");
        assert_eq!(err, CatalogError::DuplicateId("a".to_string()));
    }

    #[test]
    fn test_definition_wider_than_grid_rejected() {
        let wide = WidgetDefinition::new("wide", "Wide", WidgetCategory::Charts, 13, 2);
        let err = WidgetCatalog::new(vec![wide], LayoutPreset::empty()).expect_err("too wide");
        assert!(matches!(err, CatalogError::InvalidDefinition { ref id, .. } if id == "wide"));
    }

    #[test]
    fn test_definition_zero_height_rejected() {
        let flat = WidgetDefinition::new("flat", "Flat", WidgetCategory::Charts, 4, 0);
        assert!(WidgetCatalog::new(vec![flat], LayoutPreset::empty()).is_err());
    }

    #[test]
    fn test_default_outside_bounds_rejected() {
        let def = metric("m").with_min(4, 1);
        let err = WidgetCatalog::new(vec![def], LayoutPreset::empty()).expect_err("min > default");
        assert!(err.to_string().contains("width"));
    }

    #[test]
    fn test_preset_with_unknown_widget_rejected() {
        let preset = LayoutPreset::new("default", &[("ghost", 0, 0)]);
        let err = WidgetCatalog::new(vec![metric("a")], preset).expect_err("unknown preset id");
        assert!(matches!(err, CatalogError::InvalidPreset(_)));
    }

    #[test]
    fn test_preset_with_overlap_rejected() {
        let preset = LayoutPreset::new("default", &[("a", 0, 0), ("b", 1, 1)]);
        let err = WidgetCatalog::new(vec![metric("a"), metric("b")], preset)
            .expect_err("overlapping preset");
        assert!(matches!(
            err,
            CatalogError::InvalidPreset(LayoutViolation::Overlap { .. })
        ));
    }

    #[test]
    fn test_builder_methods() {
        let def = WidgetDefinition::new("ai", "AI", WidgetCategory::Insights, 4, 4)
            .with_min(3, 3)
            .with_max(6, 6)
            .premium()
            .requires(&["trades", "journal"]);
        assert_eq!(def.min_width, Some(3));
        assert_eq!(def.max_height, Some(6));
        assert!(def.is_premium);
        assert_eq!(def.requires_data, vec!["trades", "journal"]);
    }

    #[test]
    fn test_category_display_is_kebab_case() {
        assert_eq!(WidgetCategory::Gamification.to_string(), "gamification");
        assert_eq!(WidgetCategory::Metrics.to_string(), "metrics");
    }

    #[test]
    fn test_catalog_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WidgetCatalog>();
    }
}
