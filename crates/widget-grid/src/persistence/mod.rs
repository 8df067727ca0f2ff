//! Persistence gateway for layout blobs.
//!
//! The layout engine only needs three things from storage: load a blob by
//! user, save a blob by user, and tolerate the historical blob shapes on
//! read. [`LayoutGateway`] is that contract; [`FileGateway`] keeps one JSON
//! file per user and [`MemoryGateway`] keeps blobs in process for tests.

pub mod blob;
mod error;
mod file;
mod memory;

pub use blob::{BlobItem, LayoutBlob};
pub use error::PersistenceError;
pub use file::FileGateway;
pub use memory::MemoryGateway;

use serde_json::Value;
use std::future::Future;

use crate::layout::Layout;
use crate::widgets::WidgetCatalog;

/// Asynchronous load/save of layout blobs keyed by user id.
///
/// `load` returns the raw JSON so the caller can apply shape detection;
/// `Ok(None)` means the user has never saved a layout.
pub trait LayoutGateway: Send + Sync + 'static {
    /// Loads the stored blob for `user_id`.
    fn load(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<Value>, PersistenceError>> + Send;

    /// Replaces the stored blob for `user_id`.
    fn save(
        &self,
        user_id: &str,
        blob: &LayoutBlob,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}

/// Loads the layout for `user_id`, falling back to the catalog default.
///
/// A missing blob, a failed read, and an unrecognized shape all yield
/// `catalog.default_layout()`; the failure is logged, never returned.
pub async fn load_or_default<G: LayoutGateway>(
    gateway: &G,
    user_id: &str,
    catalog: &WidgetCatalog,
) -> Layout {
    match gateway.load(user_id).await {
        Ok(Some(value)) => match blob::parse_layout(&value, catalog) {
            Ok(layout) => {
                tracing::debug!("Loaded layout for {} ({} widgets)", user_id, layout.len());
                layout
            }
            Err(e) => {
                tracing::warn!("Stored layout for {} unusable, using default: {}", user_id, e);
                catalog.default_layout()
            }
        },
        Ok(None) => {
            tracing::debug!("No stored layout for {}, using default", user_id);
            catalog.default_layout()
        }
        Err(e) => {
            tracing::warn!("Failed to load layout for {}, using default: {}", user_id, e);
            catalog.default_layout()
        }
    }
}
