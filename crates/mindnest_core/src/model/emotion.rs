//! Emotion log records.

use crate::model::ids::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged feeling. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionEntry {
    pub id: EntityId,
    pub emotion: String,
    pub emoji: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Caller-supplied part of an emotion entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmotionDraft {
    pub emotion: String,
    pub emoji: String,
    pub note: Option<String>,
}

impl EmotionDraft {
    pub fn new(emotion: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            emotion: emotion.into(),
            emoji: emoji.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
