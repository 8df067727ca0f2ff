//! Layout model: placed widget instances and the invariants they satisfy.
//!
//! A [`Layout`] is an ordered sequence of [`WidgetInstance`]s. At every
//! observable state (outside an in-progress drag) it must satisfy:
//!
//! 1. ids are unique;
//! 2. every instance lies inside the 12-column grid with a non-empty span;
//! 3. no two instance rectangles overlap;
//! 4. every id exists in the widget catalog.
//!
//! [`Layout::validate`] checks all four and reports the first violation.

use std::collections::HashSet;

use crate::widgets::{WidgetCatalog, WidgetDefinition};
use crate::GRID_COLUMNS;

/// Half-open grid rectangle `[x, x + w) x [y, y + h)` in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// First column to the right of the rectangle.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// First row below the rectangle.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Returns `true` if the two rectangles share at least one cell.
    pub fn overlaps(&self, other: &GridRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns `true` if the rectangle fits inside the grid columns.
    pub fn fits_grid(&self) -> bool {
        self.w > 0 && self.h > 0 && self.right() <= GRID_COLUMNS
    }
}

/// A placed occurrence of a catalog widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetInstance {
    /// Catalog id of the widget. Unique within a layout.
    pub id: String,
    /// Column of the left edge (zero-based).
    pub x: u32,
    /// Row of the top edge (zero-based).
    pub y: u32,
    /// Column span.
    pub w: u32,
    /// Row span.
    pub h: u32,
    pub min_w: Option<u32>,
    pub min_h: Option<u32>,
    pub max_w: Option<u32>,
    pub max_h: Option<u32>,
}

impl WidgetInstance {
    /// Creates an instance without size overrides.
    pub fn new(id: impl Into<String>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
            min_w: None,
            min_h: None,
            max_w: None,
            max_h: None,
        }
    }

    /// Creates an instance at `(x, y)` with the definition's default span and
    /// size bounds.
    pub fn from_definition(definition: &WidgetDefinition, x: u32, y: u32) -> Self {
        Self {
            id: definition.id.clone(),
            x,
            y,
            w: definition.default_width,
            h: definition.default_height,
            min_w: definition.min_width,
            min_h: definition.min_height,
            max_w: definition.max_width,
            max_h: definition.max_height,
        }
    }

    /// The rectangle the instance occupies.
    pub fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.w, self.h)
    }

    /// Moves the instance origin, keeping its span.
    pub fn move_to(&mut self, x: u32, y: u32) {
        self.x = x;
        self.y = y;
    }

    /// Read-only dimension label shown in edit mode, e.g. `"4 x 2"`.
    pub fn dimensions(&self) -> String {
        format!("{} x {}", self.w, self.h)
    }
}

/// A broken layout invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutViolation {
    /// The same widget id appears twice.
    #[error("widget '{0}' appears more than once")]
    DuplicateId(String),

    /// The instance extends past the right edge of the grid.
    #[error("widget '{id}' spans columns {x}..{right}, outside the grid")]
    OutOfBounds {
        /// Offending widget id.
        id: String,
        /// Left column.
        x: u32,
        /// First column past the right edge.
        right: u32,
    },

    /// The instance has zero width or height.
    #[error("widget '{0}' has an empty span")]
    EmptySpan(String),

    /// Two instances share cells.
    #[error("widgets '{first}' and '{second}' overlap")]
    Overlap {
        /// Earlier instance in layout order.
        first: String,
        /// Later instance in layout order.
        second: String,
    },

    /// The id is not registered in the catalog.
    #[error("widget '{0}' is not in the catalog")]
    UnknownWidget(String),
}

/// Ordered collection of placed widget instances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    items: Vec<WidgetInstance>,
}

impl Layout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps instances as-is. Call [`Layout::validate`] before trusting them.
    pub fn from_instances(items: Vec<WidgetInstance>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Instances in layout order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &WidgetInstance> {
        self.items.iter()
    }

    pub fn instances(&self) -> &[WidgetInstance] {
        &self.items
    }

    pub fn into_instances(self) -> Vec<WidgetInstance> {
        self.items
    }

    /// Ids in layout order.
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.id.as_str()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&WidgetInstance> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Index of the instance in layout order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    /// Appends an instance without checking invariants.
    pub fn push(&mut self, instance: WidgetInstance) {
        self.items.push(instance);
    }

    /// Inserts an instance at `index` (clamped to the end).
    pub fn insert(&mut self, index: usize, instance: WidgetInstance) {
        let index = index.min(self.items.len());
        self.items.insert(index, instance);
    }

    /// Removes the instance with `id`, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<WidgetInstance> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    /// First row below every instance (0 for an empty layout).
    pub fn bottom(&self) -> u32 {
        self.items.iter().map(|i| i.rect().bottom()).max().unwrap_or(0)
    }

    /// Instances sorted by `(y, x)`, ties kept in layout order.
    pub fn sorted_by_position(&self) -> Vec<&WidgetInstance> {
        let mut sorted: Vec<&WidgetInstance> = self.items.iter().collect();
        sorted.sort_by_key(|i| (i.y, i.x));
        sorted
    }

    /// Returns `true` if `rect` overlaps any instance other than `exclude`.
    pub fn overlaps_any(&self, rect: &GridRect, exclude: Option<&str>) -> bool {
        self.items
            .iter()
            .filter(|i| exclude != Some(i.id.as_str()))
            .any(|i| i.rect().overlaps(rect))
    }

    /// Checks every layout invariant, reporting the first violation found.
    pub fn validate(&self, catalog: &WidgetCatalog) -> Result<(), LayoutViolation> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for instance in &self.items {
            if !seen.insert(instance.id.as_str()) {
                return Err(LayoutViolation::DuplicateId(instance.id.clone()));
            }
            if !catalog.contains(&instance.id) {
                return Err(LayoutViolation::UnknownWidget(instance.id.clone()));
            }
            if instance.w == 0 || instance.h == 0 {
                return Err(LayoutViolation::EmptySpan(instance.id.clone()));
            }
            let rect = instance.rect();
            if !rect.fits_grid() {
                return Err(LayoutViolation::OutOfBounds {
                    id: instance.id.clone(),
                    x: rect.x,
                    right: rect.right(),
                });
            }
        }
        for (index, first) in self.items.iter().enumerate() {
            let first_rect = first.rect();
            if let Some(second) = self.items[index + 1..]
                .iter()
                .find(|other| other.rect().overlaps(&first_rect))
            {
                return Err(LayoutViolation::Overlap {
                    first: first.id.clone(),
                    second: second.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Compares instance sets ignoring layout order.
    pub fn same_instances(&self, other: &Layout) -> bool {
        self.len() == other.len()
            && self
                .items
                .iter()
                .all(|i| other.get(&i.id).is_some_and(|o| o == i))
    }
}
