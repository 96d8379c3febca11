//! Domain store.
//!
//! # Responsibility
//! - Own every routine, emotion entry, recent symbol, daily schedule and IEP.
//! - Apply mutations that keep nested collections structurally consistent.
//! - Persist the durable subset after each applied mutation.
//!
//! # Invariants
//! - One `AppStore` is constructed explicitly and passed to consumers; there
//!   is no process-wide instance.
//! - Unknown ids never raise errors: the mutation is a no-op and reports
//!   `Outcome::NoOp`.
//! - The current routine is held as an id and resolved on every read, so it
//!   can never diverge from the canonical routine list.
//! - Persistence failures are logged and counted; in-memory state stays
//!   authoritative and no other data is lost.

mod emotions;
mod ieps;
mod routines;
mod schedules;
mod settings;

use crate::config::StoreConfig;
use crate::model::ids::EntityId;
use crate::repo::snapshot::DurableState;
use crate::repo::state_repo::{LoadSource, StateRepository};
use crate::repo::storage::{KeyValueStorage, MemoryStorage};
use crate::speech::Announcer;
use log::{debug, error, info, warn};

/// Result of a mutation.
///
/// Ignoring it is always safe; it only tells callers whether state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Nothing matched (unknown id, edge of a list); state is unchanged.
    NoOp,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Authoritative in-memory container for all app records.
pub struct AppStore<S: KeyValueStorage> {
    state: DurableState,
    current_routine_id: Option<EntityId>,
    repo: StateRepository<S>,
    announcer: Option<Box<dyn Announcer>>,
    config: StoreConfig,
    load_source: LoadSource,
    persist_failures: u64,
}

impl AppStore<MemoryStorage> {
    /// Store over fresh process-local storage with default config.
    pub fn in_memory() -> Self {
        Self::open(MemoryStorage::new(), StoreConfig::default())
    }
}

impl<S: KeyValueStorage> AppStore<S> {
    /// Rehydrates a store from `storage`.
    ///
    /// Absent, unreadable or corrupt data yields defaults; this never fails.
    /// A recent-symbol limit below 1 is raised to 1.
    pub fn open(storage: S, mut config: StoreConfig) -> Self {
        if let Err(err) = config.validate() {
            warn!(
                "event=store_open module=store status=fallback reason=invalid_config error={}",
                err
            );
            config.recent_symbols_limit = config.recent_symbols_limit.max(1);
        }
        let repo = StateRepository::new(
            storage,
            config.storage_key.clone(),
            config.recent_symbols_limit,
        );
        let (state, load_source) = repo.load();
        info!(
            "event=store_open module=store status=ok source={:?} key={}",
            load_source,
            repo.key()
        );
        Self {
            state,
            current_routine_id: None,
            repo,
            announcer: None,
            config,
            load_source,
            persist_failures: 0,
        }
    }

    /// Attaches the speech output used by `speak`.
    pub fn with_announcer(mut self, announcer: Box<dyn Announcer>) -> Self {
        self.announcer = Some(announcer);
        self
    }

    pub fn set_announcer(&mut self, announcer: Option<Box<dyn Announcer>>) {
        self.announcer = announcer;
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Where the initial state came from.
    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    /// Number of saves that failed since the store was opened.
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures
    }

    /// Read-only view of everything that is persisted.
    pub fn durable_state(&self) -> &DurableState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        self.repo.storage()
    }

    /// Consumes the store and hands back its storage backend.
    pub fn into_storage(self) -> S {
        self.repo.into_storage()
    }

    /// Clears every durable collection, restores default settings and drops
    /// the current-routine pointer.
    pub fn reset_all(&mut self) {
        self.state = DurableState::default();
        self.current_routine_id = None;
        info!("event=store_reset module=store status=ok");
        self.persist();
    }

    /// Writes the durable subset. Failures are logged and counted only.
    fn persist(&mut self) {
        if let Err(err) = self.repo.save(&self.state) {
            self.persist_failures += 1;
            error!(
                "event=state_save module=store status=error failures={} error={}",
                self.persist_failures, err
            );
        }
    }

    /// Persists after an applied mutation and passes the outcome through.
    fn commit(&mut self, event: &'static str, outcome: Outcome) -> Outcome {
        match outcome {
            Outcome::Applied => {
                debug!("event={} module=store status=ok", event);
                self.persist();
            }
            Outcome::NoOp => debug!("event={} module=store status=noop", event),
        }
        outcome
    }
}
