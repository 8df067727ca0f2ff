//! Pointer-driven drag and reorder.
//!
//! [`DragController`] is a two-state machine, `Idle` and `Dragging`, fed with
//! plain pixel coordinates so any input source (mouse, touch, tests) can
//! drive it. While dragging, only a visual offset changes; the committed
//! layout is untouched and overlaps are allowed. On release the dragged box
//! is snapped to the grid, moved to the nearest free slot, ranked in the
//! instance sequence by `(y, x)`, and handed to
//! [`LayoutStore::update_layout`].

mod metrics;

#[cfg(test)]
mod tests;

pub use metrics::{GridMetrics, PixelRect, Point};

use crate::layout::placement::nearest_free_slot;
use crate::layout::{GridRect, Layout, WidgetInstance};
use crate::store::LayoutStore;
use crate::LayoutError;

/// An in-progress drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Id of the dragged widget.
    pub widget_id: String,
    /// Grid rectangle of the widget when the drag started.
    pub origin: GridRect,
    /// Pixel box of the widget when the drag started. Its size is kept for
    /// the whole drag.
    pub start_box: PixelRect,
    /// Pointer position at pointer-down.
    pub grab: Point,
    /// Latest pointer position.
    pub pointer: Point,
}

impl DragSession {
    /// Pointer displacement since pointer-down.
    pub fn offset(&self) -> (f64, f64) {
        (self.pointer.x - self.grab.x, self.pointer.y - self.grab.y)
    }

    /// The dragged box at its current visual position.
    pub fn ghost(&self) -> PixelRect {
        let (dx, dy) = self.offset();
        self.start_box.translate(dx, dy)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// What a release at the current pointer position would produce.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPreview {
    pub widget_id: String,
    /// Visual box following the pointer.
    pub ghost: PixelRect,
    /// Grid rectangle the widget would be committed to.
    pub slot: GridRect,
    /// Position the widget would take in the instance sequence.
    pub index: usize,
}

/// Result of [`DragController::release`].
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The widget moved to this rectangle and the store accepted the layout.
    Committed(GridRect),
    /// The drop resolved to the widget's original cell.
    Unchanged,
    /// The store refused the resulting layout.
    Rejected(LayoutError),
    /// No drag was in progress.
    NotDragging,
}

/// Drag/reorder state machine for one dashboard.
#[derive(Debug, Clone)]
pub struct DragController {
    metrics: GridMetrics,
    edit_mode: bool,
    state: DragState,
}

impl DragController {
    /// Creates an idle controller with edit mode off.
    pub fn new(metrics: GridMetrics) -> Self {
        Self {
            metrics,
            edit_mode: false,
            state: DragState::Idle,
        }
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Enables or disables dragging. Leaving edit mode cancels an active drag.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        self.edit_mode = enabled;
        if !enabled {
            self.cancel();
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Id of the widget being dragged, if any.
    pub fn dragged_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging(session) => Some(&session.widget_id),
            DragState::Idle => None,
        }
    }

    /// Starts dragging the widget under `point`.
    ///
    /// Returns `false` (and stays idle) outside edit mode, while another drag
    /// is active, or when no widget is under the pointer.
    pub fn pointer_down(&mut self, layout: &Layout, point: Point) -> bool {
        if !self.edit_mode || self.is_dragging() {
            return false;
        }
        let Some(instance) = layout
            .iter()
            .find(|i| self.metrics.cell_rect(&i.rect()).contains(point))
        else {
            return false;
        };
        tracing::debug!("Drag started on {}", instance.id);
        self.state = DragState::Dragging(DragSession {
            widget_id: instance.id.clone(),
            origin: instance.rect(),
            start_box: self.metrics.cell_rect(&instance.rect()),
            grab: point,
            pointer: point,
        });
        true
    }

    /// Updates the visual offset. Returns `false` when idle.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        match &mut self.state {
            DragState::Dragging(session) => {
                session.pointer = point;
                true
            }
            DragState::Idle => false,
        }
    }

    /// Reports where the widget would land if released now.
    pub fn preview(&self, layout: &Layout) -> Option<DragPreview> {
        let DragState::Dragging(session) = &self.state else {
            return None;
        };
        let (slot, projected) = project(&self.metrics, layout, session)?;
        Some(DragPreview {
            widget_id: session.widget_id.clone(),
            ghost: session.ghost(),
            slot,
            index: projected.position(&session.widget_id)?,
        })
    }

    /// Ends the drag at `point` and commits the result to `store`.
    pub fn release(&mut self, point: Point, store: &mut LayoutStore) -> DropOutcome {
        let DragState::Dragging(mut session) = std::mem::take(&mut self.state) else {
            return DropOutcome::NotDragging;
        };
        session.pointer = point;

        let Some((slot, projected)) = project(&self.metrics, store.layout(), &session) else {
            tracing::warn!(
                "Dragged widget {} left the layout during the drag",
                session.widget_id
            );
            return DropOutcome::Unchanged;
        };
        if (slot.x, slot.y) == (session.origin.x, session.origin.y) {
            tracing::debug!("Drop of {} returned to its origin", session.widget_id);
            return DropOutcome::Unchanged;
        }

        match store.update_layout(projected) {
            Ok(()) => {
                tracing::debug!(
                    "Dropped {} at ({}, {})",
                    session.widget_id,
                    slot.x,
                    slot.y
                );
                DropOutcome::Committed(slot)
            }
            Err(e) => {
                tracing::warn!("Drop of {} rejected: {}", session.widget_id, e);
                DropOutcome::Rejected(e)
            }
        }
    }

    /// Abandons the drag. Returns `false` when idle.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => {
                tracing::debug!("Drag of {} cancelled", session.widget_id);
                true
            }
            DragState::Idle => false,
        }
    }
}

/// Resolves the session against `layout`: the committed slot and the
/// reordered layout. `None` if the widget is no longer present.
fn project(
    metrics: &GridMetrics,
    layout: &Layout,
    session: &DragSession,
) -> Option<(GridRect, Layout)> {
    let id = session.widget_id.as_str();
    let instance = layout.get(id)?;
    let target = metrics.snap(session.ghost().origin(), instance.w);
    let (x, y) = nearest_free_slot(layout, instance.w, instance.h, target, Some(id));

    let mut moved = instance.clone();
    moved.move_to(x, y);
    let slot = moved.rect();

    let mut items: Vec<WidgetInstance> = layout.iter().filter(|i| i.id != id).cloned().collect();
    let index = items
        .iter()
        .position(|i| (i.y, i.x) > (y, x))
        .unwrap_or(items.len());
    items.insert(index, moved);
    Some((slot, Layout::from_instances(items)))
}
