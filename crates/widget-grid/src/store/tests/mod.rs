//! Tests for the LayoutStore module.
//!
//! Tests are organized into categories:
//! - `basic`: Placement through the store and mutation semantics
//! - `persistence`: Save queueing, coalescing and failure policy
//! - `events`: Broadcast notifications


use super::{LayoutStore, StoreOptions};
use crate::persistence::MemoryGateway;
use crate::widgets::WidgetCatalog;
use serde_json::json;
use std::sync::Arc;

/// Opens a store for "alice" over `gateway` with the builtin catalog.
pub(super) async fn open_with(gateway: &Arc<MemoryGateway>) -> LayoutStore {
    LayoutStore::open(
        Arc::new(WidgetCatalog::builtin()),
        Arc::clone(gateway),
        "alice",
        StoreOptions::default(),
    )
    .await
}

/// Opens a store whose saved layout is empty.
pub(super) async fn open_empty() -> (LayoutStore, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::new().with_blob("alice", json!({ "layout": [] })));
    let store = open_with(&gateway).await;
    (store, gateway)
}

/// Opens a store seeded with `items` in the bare-array blob shape.
pub(super) async fn open_seeded(items: serde_json::Value) -> (LayoutStore, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::new().with_blob("alice", items));
    let store = open_with(&gateway).await;
    (store, gateway)
}
