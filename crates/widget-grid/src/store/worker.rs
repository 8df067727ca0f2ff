//! Background persistence worker.
//!
//! The store hands every post-mutation snapshot to this task over an
//! unbounded channel and moves on. The worker saves snapshots one at a time;
//! before each save it drains whatever else is queued and keeps only the
//! newest snapshot, so a burst of mutations becomes a single write of the
//! latest layout and an older snapshot can never overwrite a newer one.
//!
//! There is no retry and no rollback: a failed save is reported and the next
//! mutation's snapshot carries the unsaved change along.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::timeout;

use super::LayoutEvent;
use crate::persistence::{LayoutBlob, LayoutGateway, PersistenceError};

/// A layout snapshot tagged with the revision it was taken at.
#[derive(Debug)]
pub(super) struct Snapshot {
    pub(super) revision: u64,
    pub(super) blob: LayoutBlob,
}

/// Messages accepted by the worker.
#[derive(Debug)]
pub(super) enum SaveCommand {
    /// Persist this snapshot (or a newer one).
    Save(Snapshot),
    /// Reply once every earlier snapshot has been attempted.
    Flush(oneshot::Sender<()>),
}

pub(super) struct PersistenceWorker<G> {
    gateway: Arc<G>,
    user_id: String,
    save_timeout: Duration,
    events: broadcast::Sender<LayoutEvent>,
    persisted: Arc<AtomicU64>,
}

impl<G: LayoutGateway> PersistenceWorker<G> {
    pub(super) fn new(
        gateway: Arc<G>,
        user_id: String,
        save_timeout: Duration,
        events: broadcast::Sender<LayoutEvent>,
        persisted: Arc<AtomicU64>,
    ) -> Self {
        Self {
            gateway,
            user_id,
            save_timeout,
            events,
            persisted,
        }
    }

    /// Spawns the worker on the current tokio runtime.
    ///
    /// The task ends when every sender has been dropped.
    pub(super) fn spawn(self) -> mpsc::UnboundedSender<SaveCommand> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(self.run(rx));
        tx
    }

    async fn run(self, mut rx: mpsc::UnboundedReceiver<SaveCommand>) {
        while let Some(command) = rx.recv().await {
            let mut latest: Option<Snapshot> = None;
            let mut waiters = Vec::new();
            let mut pending = Some(command);

            while let Some(command) = pending.take().or_else(|| rx.try_recv().ok()) {
                match command {
                    SaveCommand::Save(snapshot) => {
                        if let Some(superseded) = latest.replace(snapshot) {
                            tracing::trace!("Coalesced snapshot at revision {}", superseded.revision);
                        }
                    }
                    SaveCommand::Flush(reply) => waiters.push(reply),
                }
            }

            if let Some(snapshot) = latest {
                self.save(snapshot).await;
            }
            for reply in waiters {
                let _ = reply.send(());
            }
        }
        tracing::debug!("Persistence worker for {} stopped", self.user_id);
    }

    async fn save(&self, snapshot: Snapshot) {
        let result = match timeout(
            self.save_timeout,
            self.gateway.save(&self.user_id, &snapshot.blob),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(PersistenceError::Timeout(self.save_timeout)),
        };

        let event = match result {
            Ok(()) => {
                self.persisted.fetch_max(snapshot.revision, Ordering::SeqCst);
                tracing::debug!(
                    "Saved layout for {} at revision {}",
                    self.user_id,
                    snapshot.revision
                );
                LayoutEvent::SaveSucceeded {
                    revision: snapshot.revision,
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to save layout for {} at revision {}: {}",
                    self.user_id,
                    snapshot.revision,
                    error_chain(&e)
                );
                LayoutEvent::SaveFailed {
                    revision: snapshot.revision,
                    error: error_chain(&e),
                }
            }
        };
        if self.events.send(event).is_err() {
            tracing::trace!("No subscribers for save result");
        }
    }
}

/// Formats an error followed by each of its sources.
fn error_chain(error: &PersistenceError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
