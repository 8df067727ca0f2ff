//! Layout store for a single user's dashboard.
//!
//! The store owns the authoritative in-memory [`Layout`]. Mutations apply
//! synchronously and return immediately; each one bumps the revision and
//! hands a snapshot to a background persistence worker. Save failures are
//! reported as [`LayoutEvent::SaveFailed`] and never roll back local state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::layout::{placement, Layout};
use crate::persistence::{self, LayoutBlob, LayoutGateway};
use crate::widgets::WidgetCatalog;
use crate::LayoutError;

mod events;
mod worker;

#[cfg(test)]
mod tests;

pub use events::LayoutEvent;
use worker::{PersistenceWorker, SaveCommand, Snapshot};

/// Default capacity for the event broadcast channel.
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Default upper bound on a single save.
const DEFAULT_SAVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tuning knobs for [`LayoutStore::open`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Upper bound on a single gateway save.
    pub save_timeout: Duration,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            save_timeout: DEFAULT_SAVE_TIMEOUT,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Result of [`LayoutStore::add_widget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The widget was placed and a save was queued.
    Added,
    /// The widget was already on the dashboard; nothing changed.
    AlreadyPresent,
}

/// In-memory layout with fire-and-forget persistence.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use widget_grid::persistence::MemoryGateway;
/// use widget_grid::{AddOutcome, LayoutStore, StoreOptions, WidgetCatalog};
///
/// #[tokio::main]
/// async fn main() {
///     let gateway = Arc::new(MemoryGateway::new());
///     let catalog = Arc::new(WidgetCatalog::builtin());
///     let mut store = LayoutStore::open(catalog, gateway.clone(), "alice", StoreOptions::default()).await;
///
///     assert_eq!(store.add_widget("pnl-calendar"), Ok(AddOutcome::Added));
///     store.flush().await;
///     assert!(!store.is_dirty());
///     assert_eq!(gateway.save_count(), 1);
/// }
/// ```
pub struct LayoutStore {
    catalog: Arc<WidgetCatalog>,
    user_id: String,
    layout: Layout,
    /// Incremented on every applied mutation.
    revision: u64,
    /// Highest revision the worker has successfully saved.
    persisted: Arc<AtomicU64>,
    events: broadcast::Sender<LayoutEvent>,
    saver: mpsc::UnboundedSender<SaveCommand>,
}

impl std::fmt::Debug for LayoutStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutStore")
            .field("user_id", &self.user_id)
            .field("layout", &self.layout)
            .field("revision", &self.revision)
            .field("persisted", &self.persisted.load(Ordering::SeqCst))
            .field("subscriber_count", &self.events.receiver_count())
            .finish()
    }
}

impl LayoutStore {
    /// Loads the user's layout and starts the persistence worker.
    ///
    /// Load failures are logged and replaced by the catalog default layout.
    /// Must be called from within a tokio runtime.
    pub async fn open<G: LayoutGateway>(
        catalog: Arc<WidgetCatalog>,
        gateway: Arc<G>,
        user_id: impl Into<String>,
        options: StoreOptions,
    ) -> Self {
        let user_id = user_id.into();
        let layout = persistence::load_or_default(gateway.as_ref(), &user_id, &catalog).await;
        let (events, _) = broadcast::channel(options.event_capacity.max(1));
        let persisted = Arc::new(AtomicU64::new(0));
        let saver = PersistenceWorker::new(
            gateway,
            user_id.clone(),
            options.save_timeout,
            events.clone(),
            Arc::clone(&persisted),
        )
        .spawn();

        tracing::info!("Opened layout for {} ({} widgets)", user_id, layout.len());
        Self {
            catalog,
            user_id,
            layout,
            revision: 0,
            persisted,
            events,
            saver,
        }
    }

    /// Places `widget_id` with first-fit placement and queues a save.
    ///
    /// Adding a widget that is already present is a no-op.
    pub fn add_widget(&mut self, widget_id: &str) -> Result<AddOutcome, LayoutError> {
        let definition = self.catalog.require(widget_id)?;
        if self.layout.contains(widget_id) {
            tracing::debug!("Widget {} already on dashboard", widget_id);
            return Ok(AddOutcome::AlreadyPresent);
        }
        let title = definition.title.clone();
        let instance = placement::place(&self.layout, &self.catalog, widget_id)?;
        tracing::debug!(
            "Placed {} at ({}, {}) size {}",
            widget_id,
            instance.x,
            instance.y,
            instance.dimensions()
        );
        self.layout.push(instance);
        self.commit();
        self.emit(LayoutEvent::WidgetAdded {
            id: widget_id.to_string(),
            title,
        });
        Ok(AddOutcome::Added)
    }

    /// Removes `widget_id` and queues a save. Returns `false` if it was absent.
    pub fn remove_widget(&mut self, widget_id: &str) -> bool {
        let Some(removed) = self.layout.remove(widget_id) else {
            tracing::debug!("Widget {} not on dashboard", widget_id);
            return false;
        };
        let title = self
            .catalog
            .lookup(&removed.id)
            .map(|d| d.title.clone())
            .unwrap_or_else(|| removed.id.clone());
        self.commit();
        self.emit(LayoutEvent::WidgetRemoved {
            id: removed.id,
            title,
        });
        true
    }

    /// Replaces the whole layout without recomputing placement.
    ///
    /// Layouts that violate an invariant are rejected and the current layout
    /// is kept. Replacing a layout with an identical one does nothing.
    pub fn update_layout(&mut self, layout: Layout) -> Result<(), LayoutError> {
        layout.validate(&self.catalog)?;
        if layout == self.layout {
            return Ok(());
        }
        self.layout = layout;
        self.commit();
        Ok(())
    }

    /// Replaces the layout with the catalog default and queues a save.
    pub fn reset_layout(&mut self) {
        self.layout = self.catalog.default_layout();
        self.commit();
        self.emit(LayoutEvent::LayoutReset);
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn catalog(&self) -> &WidgetCatalog {
        &self.catalog
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Number of mutations applied since the store was opened.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns `true` while the latest revision has not been saved.
    pub fn is_dirty(&self) -> bool {
        self.persisted.load(Ordering::SeqCst) < self.revision
    }

    /// Subscribes to store events.
    pub fn subscribe(&self) -> broadcast::Receiver<LayoutEvent> {
        self.events.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Waits until every snapshot queued so far has been attempted.
    ///
    /// Returns immediately if the worker is gone.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.saver.send(SaveCommand::Flush(tx)).is_err() {
            tracing::warn!("Persistence worker for {} is not running", self.user_id);
            return;
        }
        let _ = rx.await;
    }

    fn commit(&mut self) {
        self.revision += 1;
        let snapshot = Snapshot {
            revision: self.revision,
            blob: LayoutBlob::from_layout(&self.layout).stamped(),
        };
        if self.saver.send(SaveCommand::Save(snapshot)).is_err() {
            tracing::warn!(
                "Persistence worker for {} is not running, revision {} not saved",
                self.user_id,
                self.revision
            );
        }
    }

    fn emit(&self, event: LayoutEvent) {
        tracing::info!("{}", event.message());
        let _ = self.events.send(event);
    }
}
