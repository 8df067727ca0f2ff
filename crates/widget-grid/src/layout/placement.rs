//! First-fit row-scan placement.
//!
//! New widgets fill gaps in existing rows before a new row is opened:
//!
//! 1. An empty layout places the widget at `(0, 0)`.
//! 2. Otherwise the distinct `y` origins of existing instances are scanned
//!    top to bottom. Within a row, instances are walked left to right with a
//!    cursor starting at column 0; a gap at least as wide as the widget that
//!    precedes an instance is taken, else the cursor jumps past the instance.
//! 3. After the last instance of a row, the remaining space at the right
//!    edge is tried.
//! 4. If no row admits the widget it opens a new row at the layout bottom.
//!
//! A candidate is only taken if the widget's full rectangle is free, so a
//! tall widget dropped into an upper row never runs into a lower one.
//! Scanning order is always ascending `(y, x)`, which makes placement
//! deterministic for identical input.

use crate::layout::model::{GridRect, Layout, WidgetInstance};
use crate::widgets::WidgetCatalog;
use crate::{LayoutError, GRID_COLUMNS};

/// Computes where `widget_id` lands when added to `layout`.
///
/// Returns the existing instance unchanged if the widget is already placed.
///
/// # Errors
///
/// [`LayoutError::UnknownWidget`] if the catalog does not know the id.
///
/// # Example
///
/// ```
/// use widget_grid::layout::{placement, Layout, WidgetInstance};
/// use widget_grid::WidgetCatalog;
///
/// let catalog = WidgetCatalog::builtin();
/// let mut layout = Layout::new();
/// layout.push(WidgetInstance::new("equity-curve", 0, 0, 4, 3));
///
/// let placed = placement::place(&layout, &catalog, "trade-count").unwrap();
/// assert_eq!((placed.x, placed.y), (4, 0));
/// ```
pub fn place(
    layout: &Layout,
    catalog: &WidgetCatalog,
    widget_id: &str,
) -> Result<WidgetInstance, LayoutError> {
    let definition = catalog.require(widget_id)?;
    if let Some(existing) = layout.get(widget_id) {
        return Ok(existing.clone());
    }
    let (x, y) = find_slot(layout, definition.default_width, definition.default_height);
    tracing::trace!(widget = widget_id, x, y, "Placement computed");
    Ok(WidgetInstance::from_definition(definition, x, y))
}

/// Finds the first free origin for a `width x height` rectangle.
///
/// `width` is clamped into `1..=12` and `height` to at least 1.
pub fn find_slot(layout: &Layout, width: u32, height: u32) -> (u32, u32) {
    let width = width.clamp(1, GRID_COLUMNS);
    let height = height.max(1);
    if layout.is_empty() {
        return (0, 0);
    }

    let sorted = layout.sorted_by_position();
    let mut rows: Vec<u32> = sorted.iter().map(|i| i.y).collect();
    rows.dedup();

    let is_free = |x: u32, y: u32| !layout.overlaps_any(&GridRect::new(x, y, width, height), None);

    for row in rows {
        let mut cursor_x = 0;
        for instance in sorted.iter().filter(|i| i.y == row) {
            if instance.x >= cursor_x && instance.x - cursor_x >= width && is_free(cursor_x, row) {
                return (cursor_x, row);
            }
            cursor_x = cursor_x.max(instance.rect().right());
        }
        if cursor_x.saturating_add(width) <= GRID_COLUMNS && is_free(cursor_x, row) {
            return (cursor_x, row);
        }
    }

    (0, layout.bottom())
}

/// Finds the free origin closest to `target` for a `width x height`
/// rectangle, ignoring the instance `exclude` (the one being moved).
///
/// Distance is Manhattan distance in grid units; ties go to the smaller
/// `(y, x)`. The target column is clamped so the rectangle fits the grid and
/// the target row is clamped to the bottom of the other instances, which is
/// always free.
///
/// Candidates are visited in rings of growing distance around the target, so
/// the cost depends on how crowded the neighbourhood is and not on how far
/// down the lowest instance sits.
pub fn nearest_free_slot(
    layout: &Layout,
    width: u32,
    height: u32,
    target: (u32, u32),
    exclude: Option<&str>,
) -> (u32, u32) {
    let width = width.clamp(1, GRID_COLUMNS);
    let height = height.max(1);
    let floor = layout
        .iter()
        .filter(|i| exclude != Some(i.id.as_str()))
        .map(|i| i.rect().bottom())
        .max()
        .unwrap_or(0);
    let max_x = GRID_COLUMNS - width;
    let (target_x, target_y) = (target.0.min(max_x), target.1.min(floor));
    let is_free =
        |x: u32, y: u32| !layout.overlaps_any(&GridRect::new(x, y, width, height), exclude);

    // (target_x, floor) is free, so the ring at distance floor - target_y
    // always yields a slot.
    for distance in 0..=floor - target_y {
        if let Some(slot) = ring(target_x, target_y, distance, max_x, floor)
            .into_iter()
            .find(|&(x, y)| is_free(x, y))
        {
            return slot;
        }
    }
    (target_x, floor)
}

/// Origins at exactly `distance` from `(cx, cy)` within `0..=max_x` and
/// `0..=max_y`, in ascending `(y, x)` order.
fn ring(cx: u32, cy: u32, distance: u32, max_x: u32, max_y: u32) -> Vec<(u32, u32)> {
    // A row more than max_x rows away from cy needs a column offset larger
    // than the grid allows.
    let min_dy = distance.saturating_sub(max_x);
    let mut rows: Vec<(u32, u32)> = Vec::new();
    for dy in (min_dy..=distance).rev() {
        if let Some(y) = cy.checked_sub(dy) {
            rows.push((y, dy));
        }
    }
    for dy in min_dy.max(1)..=distance {
        match cy.checked_add(dy) {
            Some(y) if y <= max_y => rows.push((y, dy)),
            _ => break,
        }
    }

    let mut slots = Vec::with_capacity(rows.len() * 2);
    for (y, dy) in rows {
        let dx = distance - dy;
        if let Some(x) = cx.checked_sub(dx) {
            slots.push((x, y));
        }
        if dx > 0 && cx + dx <= max_x {
            slots.push((cx + dx, y));
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{WidgetCategory, WidgetDefinition};
    use crate::layout::presets::LayoutPreset;

    /// Catalog with one widget per interesting span.
    fn catalog() -> WidgetCatalog {
        let defs = vec![
            WidgetDefinition::new("a", "A", WidgetCategory::Metrics, 4, 3),
            WidgetDefinition::new("b", "B", WidgetCategory::Metrics, 4, 2),
            WidgetDefinition::new("c", "C", WidgetCategory::Metrics, 4, 2),
            WidgetDefinition::new("small", "Small", WidgetCategory::Metrics, 2, 2),
            WidgetDefinition::new("tall", "Tall", WidgetCategory::Charts, 4, 4),
            WidgetDefinition::new("wide", "Wide", WidgetCategory::Tables, 12, 2),
            WidgetDefinition::new("half", "Half", WidgetCategory::Charts, 6, 2),
        ];
        WidgetCatalog::new(defs, LayoutPreset::empty()).expect("valid test catalog")
    }

    fn layout(items: &[(&str, u32, u32, u32, u32)]) -> Layout {
        Layout::from_instances(
            items
                .iter()
                .map(|&(id, x, y, w, h)| WidgetInstance::new(id, x, y, w, h))
                .collect(),
        )
    }

    #[test]
    fn test_empty_layout_places_at_origin() {
        let placed = place(&Layout::new(), &catalog(), "small").expect("known widget");
        assert_eq!((placed.x, placed.y, placed.w, placed.h), (0, 0, 2, 2));
    }

    #[test]
    fn test_places_at_row_end() {
        let l = layout(&[("a", 0, 0, 4, 3)]);
        let placed = place(&l, &catalog(), "small").expect("known widget");
        assert_eq!((placed.x, placed.y), (4, 0));
    }

    #[test]
    fn test_full_row_opens_new_row_below() {
        let l = layout(&[("a", 0, 0, 4, 3), ("b", 4, 0, 4, 2), ("c", 8, 0, 4, 2)]);
        let placed = place(&l, &catalog(), "small").expect("known widget");
        assert_eq!((placed.x, placed.y), (0, 3));
    }

    #[test]
    fn test_fills_gap_between_instances() {
        let l = layout(&[("a", 0, 0, 4, 3), ("b", 8, 0, 4, 2)]);
        let placed = place(&l, &catalog(), "c").expect("known widget");
        assert_eq!((placed.x, placed.y), (4, 0));
    }

    #[test]
    fn test_gap_too_narrow_is_skipped() {
        let l = layout(&[("small", 0, 0, 2, 2), ("b", 5, 0, 4, 2)]);
        // 3-column gap at 2..5 cannot take a 4-wide widget; right edge 9..13 overflows
        let placed = place(&l, &catalog(), "c").expect("known widget");
        assert_eq!((placed.x, placed.y), (0, 2));
    }

    #[test]
    fn test_upper_rows_are_filled_first() {
        let l = layout(&[("a", 0, 0, 4, 3), ("wide", 0, 3, 12, 2)]);
        let placed = place(&l, &catalog(), "small").expect("known widget");
        assert_eq!((placed.x, placed.y), (4, 0));
    }

    #[test]
    fn test_tall_widget_does_not_intrude_into_lower_row() {
        // Row 0 has room at 6..12, but a 4-high widget there would hit "wide".
        let l = layout(&[("half", 0, 0, 6, 2), ("wide", 0, 2, 12, 2)]);
        let placed = place(&l, &catalog(), "tall").expect("known widget");
        assert_eq!((placed.x, placed.y), (0, 4));
        let mut after = l.clone();
        after.push(placed);
        assert_eq!(after.validate(&catalog()), Ok(()));
    }

    #[test]
    fn test_instance_spanning_into_row_is_respected() {
        // "tall" starts in row 0 and reaches into row 2; row 2's scan starts
        // at column 0 and must not place on top of it.
        let l = layout(&[("tall", 0, 0, 4, 4), ("b", 4, 0, 8, 2), ("c", 4, 2, 4, 2)]);
        let placed = place(&l, &catalog(), "small").expect("known widget");
        assert_eq!((placed.x, placed.y), (8, 2));
    }

    #[test]
    fn test_place_is_idempotent_for_present_widget() {
        let l = layout(&[("a", 4, 1, 4, 3)]);
        let placed = place(&l, &catalog(), "a").expect("known widget");
        assert_eq!(&placed, l.get("a").expect("present"));
    }

    #[test]
    fn test_place_unknown_widget_fails() {
        let err = place(&Layout::new(), &catalog(), "missing").expect_err("unknown");
        assert_eq!(err, LayoutError::UnknownWidget("missing".to_string()));
    }

    #[test]
    fn test_place_is_deterministic() {
        let l = layout(&[("a", 0, 0, 4, 3), ("c", 8, 1, 4, 2)]);
        let cat = catalog();
        let first = place(&l, &cat, "small").expect("known widget");
        for _ in 0..10 {
            assert_eq!(place(&l, &cat, "small").expect("known widget"), first);
        }
    }

    #[test]
    fn test_placed_instance_carries_catalog_bounds() {
        let catalog = WidgetCatalog::builtin();
        let placed = place(&Layout::new(), &catalog, "pnl-calendar").expect("built-in");
        assert_eq!(placed.min_w, Some(4));
        assert_eq!(placed.max_h, Some(8));
    }

    #[test]
    fn test_any_add_sequence_keeps_invariants() {
        let catalog = WidgetCatalog::builtin();
        let ids: Vec<&str> = catalog.ids().collect();
        // Deterministic pseudo-random permutations of the catalog.
        let mut seed: u64 = 0x5eed;
        for _ in 0..50 {
            let mut order = ids.clone();
            for i in (1..order.len()).rev() {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (seed >> 33) as usize % (i + 1);
                order.swap(i, j);
            }
            let mut layout = Layout::new();
            for id in order {
                let placed = place(&layout, &catalog, id).expect("catalog id");
                layout.push(placed);
                assert_eq!(layout.validate(&catalog), Ok(()), "after adding {id}");
            }
        }
    }

    #[test]
    fn test_find_slot_clamps_span() {
        let l = layout(&[("a", 0, 0, 4, 3)]);
        assert_eq!(find_slot(&l, 40, 0), (0, 3));
    }

    #[test]
    fn test_nearest_free_slot_returns_target_when_free() {
        let l = layout(&[("a", 0, 0, 4, 3)]);
        assert_eq!(nearest_free_slot(&l, 2, 2, (6, 0), None), (6, 0));
    }

    #[test]
    fn test_nearest_free_slot_moves_off_occupied_cells() {
        let l = layout(&[("a", 0, 0, 4, 3), ("b", 4, 0, 4, 2)]);
        // Target (3, 0) collides with both. (4, 2) and (3, 3) are both at
        // distance 3; the smaller row wins.
        assert_eq!(nearest_free_slot(&l, 2, 2, (3, 0), None), (4, 2));
    }

    #[test]
    fn test_nearest_free_slot_ignores_excluded_instance() {
        let l = layout(&[("a", 0, 0, 4, 3)]);
        assert_eq!(nearest_free_slot(&l, 4, 3, (0, 0), Some("a")), (0, 0));
    }

    #[test]
    fn test_nearest_free_slot_clamps_target_into_grid() {
        let l = layout(&[("a", 0, 0, 4, 3)]);
        assert_eq!(nearest_free_slot(&l, 4, 2, (11, 50), None), (8, 3));
    }

    #[test]
    fn test_nearest_free_slot_breaks_ties_by_row_then_column() {
        let l = layout(&[("small", 4, 1, 2, 2)]);
        // Every distance-1 origin collides. At distance 2, (2, 1), (6, 1) and
        // (4, 3) are free; the smallest (y, x) wins.
        let (x, y) = nearest_free_slot(&l, 2, 2, (4, 1), None);
        assert_eq!((x, y), (2, 1));
    }

    #[test]
    fn test_nearest_free_slot_ignores_distant_rows() {
        let l = layout(&[("a", 0, 0, 4, 3), ("b", 4, 200_000_000, 4, 2)]);
        assert_eq!(nearest_free_slot(&l, 4, 2, (6, 0), None), (6, 0));
        assert_eq!(nearest_free_slot(&l, 4, 2, (0, 0), None), (0, 3));
        assert_eq!(
            nearest_free_slot(&l, 4, 2, (4, 200_000_000), None),
            (4, 199_999_998)
        );
    }

    #[test]
    fn test_nearest_free_slot_under_full_rows_uses_floor() {
        let l = layout(&[
            ("wide", 0, 0, 12, 2),
            ("b", 0, 2, 4, 2),
            ("c", 4, 2, 4, 2),
            ("a", 8, 2, 4, 3),
        ]);
        // Nothing fits above row 4; (4, 4) and (5, 5) tie at distance 5.
        assert_eq!(nearest_free_slot(&l, 4, 2, (5, 0), None), (4, 4));
    }
}
