//! Persistence error types.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or saving a layout blob.
///
/// None of these reach callers of the layout store: read errors fall back to
/// the default layout, write errors become `SaveFailed` events.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The blob could not be read from storage.
    #[error("Failed to read layout for user '{user_id}'")]
    Read {
        /// User whose layout was requested.
        user_id: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The stored bytes are not valid JSON.
    #[error("Stored layout for user '{user_id}' is not valid JSON")]
    Decode {
        /// User whose layout was requested.
        user_id: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The JSON is neither a bare array nor an object with a `layout` array.
    #[error("Unrecognized layout blob shape: {found}")]
    UnrecognizedShape {
        /// Short description of what was found instead.
        found: String,
    },

    /// The blob could not be written to storage.
    #[error("Failed to write layout for user '{user_id}'")]
    Write {
        /// User whose layout was being saved.
        user_id: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The layout could not be serialized.
    #[error("Failed to encode layout blob")]
    Encode(#[source] serde_json::Error),

    /// The gateway did not finish the save in time.
    #[error("Saving layout timed out after {}", format_timeout(.0))]
    Timeout(Duration),
}

fn format_timeout(timeout: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*timeout)
}

impl PersistenceError {
    /// Returns `true` for the load-side failures that are recovered by
    /// falling back to the default layout.
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            PersistenceError::Read { .. }
                | PersistenceError::Decode { .. }
                | PersistenceError::UnrecognizedShape { .. }
        )
    }
}
