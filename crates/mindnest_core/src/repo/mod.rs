//! Persistence adapter for durable store state.
//!
//! # Responsibility
//! - Define the key-value storage contract the store writes into.
//! - Provide in-memory and SQLite implementations.
//! - Own the persisted JSON shape and its typed rehydration.
//!
//! # Invariants
//! - Storage backends only see opaque JSON text.
//! - Transient store fields never reach storage.

pub mod snapshot;
pub mod sqlite_storage;
pub mod state_repo;
pub mod storage;
