//! Drag controller tests.
//!
//! Geometry: 1300px container, 10px margin, 80px rows, so columns are
//! 97.5px wide, one column step is 107.5px and one row step is 90px.

use super::*;
use crate::persistence::MemoryGateway;
use crate::store::StoreOptions;
use crate::widgets::WidgetCatalog;
use serde_json::json;
use std::sync::Arc;

const COLUMN_STEP: f64 = 107.5;
const ROW_STEP: f64 = 90.0;

fn controller() -> DragController {
    let mut controller = DragController::new(GridMetrics::new(1300.0, 80.0, 10.0));
    controller.set_edit_mode(true);
    controller
}

/// total-pnl (0,0,3,2), win-rate (3,0,3,2), daily-pnl (0,2,4,4).
async fn store() -> LayoutStore {
    let gateway = Arc::new(MemoryGateway::new().with_blob(
        "alice",
        json!([
            { "i": "total-pnl", "x": 0, "y": 0, "w": 3, "h": 2 },
            { "i": "win-rate", "x": 3, "y": 0, "w": 3, "h": 2 },
            { "i": "daily-pnl", "x": 0, "y": 2, "w": 4, "h": 4 }
        ]),
    ));
    LayoutStore::open(
        Arc::new(WidgetCatalog::builtin()),
        gateway,
        "alice",
        StoreOptions::default(),
    )
    .await
}

/// A point inside win-rate's pixel box (332.5..645 x 10..180).
fn on_win_rate() -> Point {
    Point::new(400.0, 50.0)
}

// =========================================================================
// Idle -> Dragging
// =========================================================================

#[tokio::test]
async fn test_pointer_down_outside_edit_mode_is_ignored() {
    let store = store().await;
    let mut controller = DragController::new(GridMetrics::new(1300.0, 80.0, 10.0));
    assert!(!controller.edit_mode());
    assert!(!controller.pointer_down(store.layout(), on_win_rate()));
    assert_eq!(*controller.state(), DragState::Idle);
}

#[tokio::test]
async fn test_pointer_down_on_empty_space_is_ignored() {
    let store = store().await;
    let mut controller = controller();
    assert!(!controller.pointer_down(store.layout(), Point::new(1200.0, 500.0)));
    assert!(!controller.is_dragging());
}

#[tokio::test]
async fn test_pointer_down_captures_widget_box() {
    let store = store().await;
    let mut controller = controller();
    assert!(controller.pointer_down(store.layout(), on_win_rate()));
    assert_eq!(controller.dragged_id(), Some("win-rate"));
    match controller.state() {
        DragState::Dragging(session) => {
            assert_eq!(session.origin, GridRect::new(3, 0, 3, 2));
            assert_eq!(session.start_box, PixelRect::new(332.5, 10.0, 312.5, 170.0));
        }
        DragState::Idle => panic!("expected an active drag"),
    }
}

#[tokio::test]
async fn test_second_pointer_down_does_not_restart_drag() {
    let store = store().await;
    let mut controller = controller();
    controller.pointer_down(store.layout(), on_win_rate());
    assert!(!controller.pointer_down(store.layout(), Point::new(50.0, 50.0)));
    assert_eq!(controller.dragged_id(), Some("win-rate"));
}

// =========================================================================
// Dragging -> Dragging
// =========================================================================

#[tokio::test]
async fn test_pointer_move_only_changes_visual_offset() {
    let store = store().await;
    let mut controller = controller();
    controller.pointer_down(store.layout(), on_win_rate());
    let before = store.layout().clone();

    // Hover straight over total-pnl; overlap is allowed mid-drag.
    assert!(controller.pointer_move(Point::new(400.0 - 3.0 * COLUMN_STEP, 50.0)));
    let preview = controller.preview(store.layout()).expect("dragging");
    assert_eq!(preview.ghost.width, 312.5);
    assert_eq!(preview.ghost.x, 10.0);
    assert_eq!(*store.layout(), before);
    assert_eq!(store.revision(), 0);
}

#[tokio::test]
async fn test_pointer_move_while_idle_is_ignored() {
    let mut controller = controller();
    assert!(!controller.pointer_move(Point::new(10.0, 10.0)));
    assert!(controller.preview(&Layout::new()).is_none());
}

#[tokio::test]
async fn test_preview_reports_projected_slot_and_order() {
    let store = store().await;
    let mut controller = controller();
    controller.pointer_down(store.layout(), on_win_rate());
    controller.pointer_move(Point::new(400.0 + 3.0 * COLUMN_STEP, 50.0));

    let preview = controller.preview(store.layout()).expect("dragging");
    assert_eq!(preview.widget_id, "win-rate");
    assert_eq!(preview.slot, GridRect::new(6, 0, 3, 2));
    assert_eq!(preview.index, 1);
}

// =========================================================================
// Dragging -> Idle
// =========================================================================

#[tokio::test]
async fn test_release_on_free_cell_commits() {
    let mut store = store().await;
    let mut controller = controller();
    controller.pointer_down(store.layout(), on_win_rate());

    let outcome = controller.release(Point::new(400.0 + 3.0 * COLUMN_STEP, 50.0), &mut store);
    assert_eq!(outcome, DropOutcome::Committed(GridRect::new(6, 0, 3, 2)));
    assert!(!controller.is_dragging());
    let moved = store.layout().get("win-rate").expect("still placed");
    assert_eq!((moved.x, moved.y), (6, 0));
    assert_eq!(store.layout().ids(), vec!["total-pnl", "win-rate", "daily-pnl"]);
    assert_eq!(store.revision(), 1);
}

#[tokio::test]
async fn test_release_on_occupied_cell_lands_on_nearest_free_slot() {
    let mut store = store().await;
    let mut controller = controller();
    controller.pointer_down(store.layout(), on_win_rate());

    // Snaps to (0, 2), which daily-pnl occupies.
    let drop_at = Point::new(400.0 - 3.0 * COLUMN_STEP, 50.0 + 2.0 * ROW_STEP);
    let outcome = controller.release(drop_at, &mut store);

    assert_eq!(outcome, DropOutcome::Committed(GridRect::new(4, 2, 3, 2)));
    assert_eq!(store.layout().ids(), vec!["total-pnl", "daily-pnl", "win-rate"]);
    store
        .layout()
        .validate(store.catalog())
        .expect("drop never creates overlaps");
}

#[tokio::test]
async fn test_release_beyond_right_edge_is_clamped() {
    let mut store = store().await;
    let mut controller = controller();
    controller.pointer_down(store.layout(), on_win_rate());

    let outcome = controller.release(Point::new(5000.0, 50.0), &mut store);
    assert_eq!(outcome, DropOutcome::Committed(GridRect::new(9, 0, 3, 2)));
}

#[tokio::test]
async fn test_release_with_far_away_widget_resolves_near_drop() {
    let gateway = Arc::new(MemoryGateway::new().with_blob(
        "alice",
        json!([
            { "i": "total-pnl", "x": 0, "y": 0, "w": 3, "h": 2 },
            { "i": "win-rate", "x": 3, "y": 200_000_000, "w": 3, "h": 2 }
        ]),
    ));
    let mut store = LayoutStore::open(
        Arc::new(WidgetCatalog::builtin()),
        gateway,
        "alice",
        StoreOptions::default(),
    )
    .await;
    let mut controller = controller();
    assert!(controller.pointer_down(store.layout(), Point::new(50.0, 50.0)));

    let drop_at = Point::new(50.0 + 6.0 * COLUMN_STEP, 50.0);
    controller.pointer_move(drop_at);
    let preview = controller.preview(store.layout()).expect("dragging");
    assert_eq!(preview.slot, GridRect::new(6, 0, 3, 2));
    let outcome = controller.release(drop_at, &mut store);
    assert_eq!(outcome, DropOutcome::Committed(GridRect::new(6, 0, 3, 2)));
}

#[tokio::test]
async fn test_release_without_movement_is_unchanged() {
    let mut store = store().await;
    let mut controller = controller();
    controller.pointer_down(store.layout(), on_win_rate());

    // Less than half a column: snaps back to the origin.
    let outcome = controller.release(Point::new(440.0, 60.0), &mut store);
    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(store.revision(), 0);
}

#[tokio::test]
async fn test_release_while_idle_is_not_dragging() {
    let mut store = store().await;
    let mut controller = controller();
    assert_eq!(
        controller.release(on_win_rate(), &mut store),
        DropOutcome::NotDragging
    );
}

#[tokio::test]
async fn test_release_after_widget_removed_is_unchanged() {
    let mut store = store().await;
    let mut controller = controller();
    controller.pointer_down(store.layout(), on_win_rate());
    store.remove_widget("win-rate");

    let outcome = controller.release(Point::new(900.0, 50.0), &mut store);
    assert_eq!(outcome, DropOutcome::Unchanged);
    assert!(!store.layout().contains("win-rate"));
}

#[tokio::test]
async fn test_cancel_leaves_layout_unchanged() {
    let store = store().await;
    let mut controller = controller();
    let before = store.layout().clone();
    controller.pointer_down(store.layout(), on_win_rate());
    controller.pointer_move(Point::new(900.0, 400.0));

    assert!(controller.cancel());
    assert!(!controller.is_dragging());
    assert!(!controller.cancel());
    assert_eq!(*store.layout(), before);
    assert_eq!(store.revision(), 0);
}

#[tokio::test]
async fn test_leaving_edit_mode_cancels_drag() {
    let store = store().await;
    let mut controller = controller();
    controller.pointer_down(store.layout(), on_win_rate());
    controller.set_edit_mode(false);
    assert!(!controller.is_dragging());
    assert!(!controller.pointer_down(store.layout(), on_win_rate()));
}
