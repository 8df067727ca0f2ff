//! In-process gateway used by tests and ephemeral sessions.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{LayoutBlob, LayoutGateway, PersistenceError};

/// Keeps blobs in a map, with switches for simulating storage failures.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    blobs: Mutex<HashMap<String, Value>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
    save_delay: Option<Duration>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a stored blob for `user_id`.
    pub fn with_blob(self, user_id: &str, blob: Value) -> Self {
        self.lock().insert(user_id.to_string(), blob);
        self
    }

    /// Delays every save, for exercising save timeouts and coalescing.
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    /// Makes subsequent loads fail with a read error.
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent saves fail with a write error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of saves that reached storage.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// The stored blob for `user_id`, if any.
    pub fn blob(&self, user_id: &str) -> Option<Value> {
        self.lock().get(user_id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn injected(kind: &str) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::Other, format!("injected {kind} failure"))
    }
}

impl LayoutGateway for MemoryGateway {
    async fn load(&self, user_id: &str) -> Result<Option<Value>, PersistenceError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Read {
                user_id: user_id.to_string(),
                source: Self::injected("load"),
            });
        }
        Ok(self.blob(user_id))
    }

    async fn save(&self, user_id: &str, blob: &LayoutBlob) -> Result<(), PersistenceError> {
        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Write {
                user_id: user_id.to_string(),
                source: Self::injected("save"),
            });
        }
        let value = serde_json::to_value(blob).map_err(PersistenceError::Encode)?;
        self.lock().insert(user_id.to_string(), value);
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
