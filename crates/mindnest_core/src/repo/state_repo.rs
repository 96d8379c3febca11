//! Durable-state repository over a key-value backend.
//!
//! # Responsibility
//! - Load the persisted blob at startup and decode it.
//! - Encode and write durable state after each mutation.
//!
//! # Invariants
//! - Loading never fails: an absent key, a backend error or a corrupt blob
//!   all yield defaults.
//! - Saving reports backend failures to the caller; it never panics.

use crate::repo::snapshot::{decode_state, encode_state, DurableState};
use crate::repo::storage::{KeyValueStorage, StorageError, StorageResult};
use log::{debug, info, warn};

/// Outcome of reading the persisted blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// No blob under the key (first run).
    Empty,
    /// A blob was found and decoded.
    Restored,
    /// The backend failed; defaults are in use.
    StorageFailed,
}

/// Reads and writes `DurableState` under one storage key.
pub struct StateRepository<S: KeyValueStorage> {
    storage: S,
    key: String,
    recent_symbols_limit: usize,
}

impl<S: KeyValueStorage> StateRepository<S> {
    pub fn new(storage: S, key: impl Into<String>, recent_symbols_limit: usize) -> Self {
        Self {
            storage,
            key: key.into(),
            recent_symbols_limit,
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Loads durable state, falling back to defaults on any failure.
    pub fn load(&self) -> (DurableState, LoadSource) {
        match self.storage.get(&self.key) {
            Ok(None) => {
                info!("event=state_load module=repo status=ok source=empty");
                (DurableState::default(), LoadSource::Empty)
            }
            Ok(Some(raw)) => {
                let state = decode_state(&raw, self.recent_symbols_limit);
                info!(
                    "event=state_load module=repo status=ok source=restored bytes={} routines={} emotions={} days={} ieps={}",
                    raw.len(),
                    state.routines.len(),
                    state.emotion_history.len(),
                    state.daily_schedules.len(),
                    state.ieps.len()
                );
                (state, LoadSource::Restored)
            }
            Err(err) => {
                warn!(
                    "event=state_load module=repo status=fallback source=storage_error error={}",
                    err
                );
                (DurableState::default(), LoadSource::StorageFailed)
            }
        }
    }

    /// Encodes and writes durable state.
    pub fn save(&self, state: &DurableState) -> StorageResult<()> {
        let payload = encode_state(state).map_err(|err| {
            StorageError::Unavailable(format!("failed to encode state: {err}"))
        })?;
        self.storage.set(&self.key, &payload)?;
        debug!(
            "event=state_save module=repo status=ok bytes={}",
            payload.len()
        );
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
