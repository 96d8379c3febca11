//! Routine and routine-step records.
//!
//! # Invariants
//! - A routine owns its steps exclusively.
//! - `order` on every step equals its position in `steps`; it is re-derived
//!   after each structural change and after loading.
//! - Steps are only created together with their routine and only removed by
//!   deleting the whole routine.

use crate::model::ids::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One checklist item inside a routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineStep {
    pub id: EntityId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub emoji: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub order: u32,
}

/// Ordered checklist completed once per run-through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub steps: Vec<RoutineStep>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Step input used when a routine is created.
///
/// `id` is optional so catalog steps can keep their slug; otherwise a fresh
/// id is generated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepDraft {
    pub id: Option<EntityId>,
    pub title: String,
    pub description: Option<String>,
    pub emoji: String,
}

impl StepDraft {
    pub fn new(title: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            emoji: emoji.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial routine update.
///
/// `completed_at: Some(None)` clears the completion stamp. Replacing `steps`
/// renumbers their `order` from the new positions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutinePatch {
    pub title: Option<String>,
    pub steps: Option<Vec<RoutineStep>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl Routine {
    /// Builds a routine from step drafts with dense 0-based step order.
    pub fn new(title: impl Into<String>, steps: Vec<StepDraft>, created_at: DateTime<Utc>) -> Self {
        let steps = steps
            .into_iter()
            .enumerate()
            .map(|(index, draft)| RoutineStep {
                id: draft.id.unwrap_or_else(EntityId::generate),
                title: draft.title,
                description: draft.description,
                emoji: draft.emoji,
                completed: false,
                order: index as u32,
            })
            .collect();
        Self {
            id: EntityId::generate(),
            title: title.into(),
            steps,
            created_at,
            completed_at: None,
        }
    }

    pub fn step(&self, step_id: &EntityId) -> Option<&RoutineStep> {
        self.steps.iter().find(|step| &step.id == step_id)
    }

    /// Returns whether the routine has steps and every one is complete.
    pub fn is_complete(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|step| step.completed)
    }

    /// Re-derives every step's `order` from its position.
    pub fn renumber_steps(&mut self) {
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.order = index as u32;
        }
    }

    pub fn apply(&mut self, patch: RoutinePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(steps) = patch.steps {
            self.steps = steps;
            self.renumber_steps();
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = completed_at;
        }
    }
}
