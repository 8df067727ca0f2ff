//! File-backed gateway: one JSON file per user.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{LayoutBlob, LayoutGateway, PersistenceError};
use crate::config::xdg;

/// Bytes kept as-is in file names. Everything else, `%` included, is
/// percent-encoded.
const FILE_NAME: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Stores each user's layout at `<dir>/<user>.json`.
///
/// Writes go to a temporary sibling file first and are renamed into place,
/// so a crash mid-write leaves the previous layout intact.
#[derive(Debug, Clone)]
pub struct FileGateway {
    dir: PathBuf,
}

impl FileGateway {
    /// Creates a gateway rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Gateway rooted at the XDG data directory.
    pub fn default_location() -> Self {
        Self::new(xdg::layouts_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the blob for `user_id`.
    ///
    /// Bytes outside `[A-Za-z0-9._-]` are percent-encoded and a leading `.`
    /// becomes `%2E`, so distinct ids map to distinct files inside the
    /// directory. The empty id maps to `%.json`.
    pub fn path_for(&self, user_id: &str) -> PathBuf {
        let encoded = utf8_percent_encode(user_id, FILE_NAME).to_string();
        let name = match encoded.strip_prefix('.') {
            Some(rest) => format!("%2E{rest}"),
            None if encoded.is_empty() => "%".to_string(),
            None => encoded,
        };
        self.dir.join(format!("{name}.json"))
    }
}

impl LayoutGateway for FileGateway {
    async fn load(&self, user_id: &str) -> Result<Option<Value>, PersistenceError> {
        let path = self.path_for(user_id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Read {
                    user_id: user_id.to_string(),
                    source,
                })
            }
        };
        tracing::trace!("Read layout blob from {:?}", path);
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| PersistenceError::Decode {
                user_id: user_id.to_string(),
                source,
            })
    }

    async fn save(&self, user_id: &str, blob: &LayoutBlob) -> Result<(), PersistenceError> {
        let path = self.path_for(user_id);
        let json = blob.to_json()?;
        let write_err = |source| PersistenceError::Write {
            user_id: user_id.to_string(),
            source,
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(write_err)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(write_err)?;
        tracing::trace!("Wrote layout blob to {:?}", path);
        Ok(())
    }
}
