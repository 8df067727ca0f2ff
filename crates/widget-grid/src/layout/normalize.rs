//! Repairs layouts read from untrusted storage.
//!
//! Persisted layouts may predate catalog changes or come from older clients.
//! Normalization turns any list of instances into one that satisfies every
//! layout invariant while leaving already-valid layouts untouched:
//!
//! - unknown ids are dropped;
//! - repeated ids keep their first occurrence;
//! - spans are clamped into the grid and origins shifted left to fit;
//! - instances that overlap an earlier one are re-placed with the
//!   first-fit scan, keeping their position in layout order.

use crate::layout::model::{Layout, WidgetInstance};
use crate::layout::placement::find_slot;
use crate::widgets::WidgetCatalog;
use crate::GRID_COLUMNS;

/// Normalizes `instances` against `catalog`.
pub fn normalize(instances: Vec<WidgetInstance>, catalog: &WidgetCatalog) -> Layout {
    let mut kept: Vec<(usize, WidgetInstance)> = Vec::with_capacity(instances.len());
    let mut displaced: Vec<(usize, WidgetInstance)> = Vec::new();

    for (index, mut instance) in instances.into_iter().enumerate() {
        if !catalog.contains(&instance.id) {
            tracing::warn!("Dropping unknown widget {} from stored layout", instance.id);
            continue;
        }
        let duplicate = kept
            .iter()
            .chain(displaced.iter())
            .any(|(_, other)| other.id == instance.id);
        if duplicate {
            tracing::warn!("Dropping duplicate widget {} from stored layout", instance.id);
            continue;
        }
        clamp_into_grid(&mut instance);
        let rect = instance.rect();
        if kept.iter().any(|(_, other)| other.rect().overlaps(&rect)) {
            displaced.push((index, instance));
        } else {
            kept.push((index, instance));
        }
    }

    for (index, mut instance) in displaced {
        let placed = Layout::from_instances(kept.iter().map(|(_, i)| i.clone()).collect());
        let (x, y) = find_slot(&placed, instance.w, instance.h);
        tracing::debug!(
            "Relocating overlapping widget {} from ({}, {}) to ({}, {})",
            instance.id,
            instance.x,
            instance.y,
            x,
            y
        );
        instance.move_to(x, y);
        kept.push((index, instance));
    }

    kept.sort_by_key(|(index, _)| *index);
    Layout::from_instances(kept.into_iter().map(|(_, i)| i).collect())
}

fn clamp_into_grid(instance: &mut WidgetInstance) {
    let (w, h) = (instance.w, instance.h);
    instance.w = w.clamp(1, GRID_COLUMNS);
    instance.h = h.max(1);
    if instance.x.saturating_add(instance.w) > GRID_COLUMNS {
        instance.x = GRID_COLUMNS - instance.w;
    }
    if (w, h) != (instance.w, instance.h) {
        tracing::debug!(
            "Clamped span of {} from {}x{} to {}x{}",
            instance.id,
            w,
            h,
            instance.w,
            instance.h
        );
    }
}
