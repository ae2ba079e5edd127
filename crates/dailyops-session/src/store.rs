//! Durable persistence of the current session.
//!
//! The store is a dumb boundary: `save`, `load`, `clear`, nothing else. No
//! validation lives here — expiry and authorization are decided above.
//!
//! The whole session (tokens + user + timestamps) is one record. Persisting
//! it as a single document is what makes the write/clear unit atomic: the
//! store can never hold a user without tokens or tokens without a user.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use dailyops_protocol::{Codec, JsonCodec};

use crate::{Session, StoreError};

/// Persists the current session across restarts.
///
/// `Send + Sync + 'static` so a store can be shared by the facade and the
/// spawned monitor task.
pub trait SessionStore: Send + Sync + 'static {
    /// Replaces the persisted session with `session`.
    fn save(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Loads the persisted session, or `None` if the store is empty.
    fn load(
        &self,
    ) -> impl Future<Output = Result<Option<Session>, StoreError>> + Send;

    /// Removes the persisted session. Clearing an empty store succeeds.
    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// An in-process store. Used by tests and short-lived tools; its contents
/// do not survive the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Session>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        *self.slot.lock().expect("store mutex poisoned") = Some(session.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.slot.lock().expect("store mutex poisoned").clone())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().expect("store mutex poisoned") = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// A store backed by one JSON document on disk.
///
/// Survives a full process restart but not a deliberate [`clear`]
/// (`SessionStore::clear`). Writes go to a sibling temp file first and are
/// renamed into place, so a reader never observes a partially written
/// record.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    codec: JsonCodec,
}

impl FileStore {
    /// Creates a store persisting to `path`. The file may not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            codec: JsonCodec,
        }
    }

    /// The path the session record lives at.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl SessionStore for FileStore {
    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        let bytes = self.codec.encode(session)?;
        let tmp = self.tmp_path();

        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(StoreError::Write)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(StoreError::Write)?;

        tracing::debug!(path = %self.path.display(), "session persisted");
        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(self.codec.decode(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read(e)),
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Write(e)),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
