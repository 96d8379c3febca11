//! Domain model for routines, emotions, schedules and IEP tracking.
//!
//! # Responsibility
//! - Define the records owned by the store and their patch/draft inputs.
//! - Keep per-record structural helpers (renumbering, sorting) next to the
//!   data they protect.
//!
//! # Invariants
//! - Ownership is a tree: no record is referenced by more than one parent.
//! - Every record is identified by an `EntityId`.

pub mod date;
pub mod emotion;
pub mod ids;
pub mod iep;
pub mod routine;
pub mod schedule;
pub mod settings;
