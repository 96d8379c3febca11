//! Daily schedule records.
//!
//! # Invariants
//! - One calendar date maps to at most one `DailySchedule`.
//! - Activities are kept in display order and `order` always equals the
//!   activity's position (dense, contiguous, 0-based).

use crate::model::ids::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One planned activity on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleActivity {
    pub id: EntityId,
    pub title: String,
    pub emoji: String,
    /// Free-form clock label, e.g. `08:30`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub order: u32,
}

/// Planned activities for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySchedule {
    pub date: NaiveDate,
    #[serde(default)]
    pub activities: Vec<ScheduleActivity>,
}

/// New activity input for incremental schedule editing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityDraft {
    pub title: String,
    pub emoji: String,
    pub time: Option<String>,
}

impl ActivityDraft {
    pub fn new(title: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            emoji: emoji.into(),
            time: None,
        }
    }

    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }
}

/// Partial in-place activity update.
///
/// `time: Some(None)` clears the clock label. Ordering is changed through the
/// move operations, never through a patch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityPatch {
    pub title: Option<String>,
    pub emoji: Option<String>,
    pub time: Option<Option<String>>,
    pub completed: Option<bool>,
}

impl ActivityPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

/// Direction for a one-slot activity move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl ScheduleActivity {
    pub fn from_draft(draft: ActivityDraft, order: u32) -> Self {
        Self {
            id: EntityId::generate(),
            title: draft.title,
            emoji: draft.emoji,
            time: draft.time,
            completed: false,
            order,
        }
    }

    pub fn apply(&mut self, patch: ActivityPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(emoji) = patch.emoji {
            self.emoji = emoji;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

impl DailySchedule {
    /// Builds a day from caller-ordered activities.
    ///
    /// Activities are stably sorted by their incoming `order` and then
    /// renumbered densely, so gaps and duplicates never survive a save.
    pub fn new(date: NaiveDate, mut activities: Vec<ScheduleActivity>) -> Self {
        activities.sort_by_key(|activity| activity.order);
        let mut schedule = Self { date, activities };
        schedule.renumber();
        schedule
    }

    pub fn activity(&self, activity_id: &EntityId) -> Option<&ScheduleActivity> {
        self.activities
            .iter()
            .find(|activity| &activity.id == activity_id)
    }

    pub fn position(&self, activity_id: &EntityId) -> Option<usize> {
        self.activities
            .iter()
            .position(|activity| &activity.id == activity_id)
    }

    /// Re-derives every activity's `order` from its position.
    pub fn renumber(&mut self) {
        for (index, activity) in self.activities.iter_mut().enumerate() {
            activity.order = index as u32;
        }
    }

    /// Moves one activity a single slot. Returns `false` at the edges or when
    /// the id is unknown.
    pub fn move_activity(&mut self, activity_id: &EntityId, direction: MoveDirection) -> bool {
        let Some(index) = self.position(activity_id) else {
            return false;
        };
        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.activities.len() => index + 1,
            _ => return false,
        };
        self.activities.swap(index, target);
        self.renumber();
        true
    }
}
