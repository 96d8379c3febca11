//! Individualized Education Program records.
//!
//! # Invariants
//! - An IEP owns its goals; a goal owns its progress entries.
//! - `progress_entries` is sorted ascending by `date` after every append.
//!   Entries sharing a date keep their insertion order.

use crate::model::ids::EntityId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One dated measurement logged against a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IepProgressEntry {
    pub id: EntityId,
    pub date: NaiveDate,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// One learning goal inside an IEP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IepGoal {
    pub id: EntityId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-text target, e.g. `80% accuracy`.
    pub target: String,
    /// Structured numeric threshold. Takes precedence over the number
    /// embedded in `target` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    #[serde(default)]
    pub progress_entries: Vec<IepProgressEntry>,
    pub created_at: DateTime<Utc>,
}

/// Education plan for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Iep {
    pub id: EntityId,
    pub student_name: String,
    pub iep_period: String,
    #[serde(default)]
    pub goals: Vec<IepGoal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IepDraft {
    pub student_name: String,
    pub iep_period: String,
}

impl IepDraft {
    pub fn new(student_name: impl Into<String>, iep_period: impl Into<String>) -> Self {
        Self {
            student_name: student_name.into(),
            iep_period: iep_period.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IepPatch {
    pub student_name: Option<String>,
    pub iep_period: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoalDraft {
    pub title: String,
    pub description: Option<String>,
    pub target: String,
    pub target_value: Option<f64>,
}

impl GoalDraft {
    pub fn new(title: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            target: target.into(),
            target_value: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_target_value(mut self, value: f64) -> Self {
        self.target_value = Some(value);
        self
    }
}

/// Partial goal update. `Some(None)` clears an optional field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub target: Option<String>,
    pub target_value: Option<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressDraft {
    pub date: NaiveDate,
    pub value: f64,
    pub notes: Option<String>,
}

impl ProgressDraft {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl Iep {
    pub fn goal(&self, goal_id: &EntityId) -> Option<&IepGoal> {
        self.goals.iter().find(|goal| &goal.id == goal_id)
    }

    pub fn goal_mut(&mut self, goal_id: &EntityId) -> Option<&mut IepGoal> {
        self.goals.iter_mut().find(|goal| &goal.id == goal_id)
    }

    pub fn apply(&mut self, patch: IepPatch) {
        if let Some(student_name) = patch.student_name {
            self.student_name = student_name;
        }
        if let Some(iep_period) = patch.iep_period {
            self.iep_period = iep_period;
        }
    }
}

impl IepGoal {
    pub fn from_draft(draft: GoalDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: EntityId::generate(),
            title: draft.title,
            description: draft.description,
            target: draft.target,
            target_value: draft.target_value,
            progress_entries: Vec::new(),
            created_at,
        }
    }

    /// Last entry of the date-sorted log.
    pub fn latest_entry(&self) -> Option<&IepProgressEntry> {
        self.progress_entries.last()
    }

    /// Appends one entry and re-sorts the whole log by date.
    pub fn push_entry(&mut self, entry: IepProgressEntry) {
        self.progress_entries.push(entry);
        self.sort_entries();
    }

    /// Stable ascending sort by `date`.
    pub fn sort_entries(&mut self) {
        self.progress_entries.sort_by_key(|entry| entry.date);
    }

    pub fn apply(&mut self, patch: GoalPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(target) = patch.target {
            self.target = target;
        }
        if let Some(target_value) = patch.target_value {
            self.target_value = target_value;
        }
    }
}
