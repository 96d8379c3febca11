//! Core domain store for MindNest.
//! This crate owns every routine, emotion entry, schedule and IEP record, and
//! is the single source of truth for their invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod progress;
pub mod repo;
pub mod speech;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::emotion::{EmotionDraft, EmotionEntry};
pub use model::ids::EntityId;
pub use model::iep::{
    GoalDraft, GoalPatch, Iep, IepDraft, IepGoal, IepPatch, IepProgressEntry, ProgressDraft,
};
pub use model::routine::{Routine, RoutinePatch, RoutineStep, StepDraft};
pub use model::schedule::{
    ActivityDraft, ActivityPatch, DailySchedule, MoveDirection, ScheduleActivity,
};
pub use model::settings::{AppSettings, SettingsPatch, TextSize, Theme};
pub use repo::sqlite_storage::SqliteStorage;
pub use repo::state_repo::LoadSource;
pub use repo::storage::{KeyValueStorage, MemoryStorage, StorageError, StorageResult};
pub use speech::{Announcer, SpeechProfile, Utterance};
pub use store::{AppStore, Outcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
