//! Speech announcer contract.
//!
//! # Responsibility
//! - Describe the audible-output capability the store delegates to.
//! - Carry the voice profile applied to every utterance.
//!
//! # Invariants
//! - Announcing is fire-and-forget; the store never waits for playback.
//! - A new announcement cancels the one in progress (no queue).

use serde::{Deserialize, Serialize};

/// Voice parameters applied to every utterance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechProfile {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechProfile {
    fn default() -> Self {
        Self {
            rate: 0.8,
            pitch: 1.1,
            volume: 0.8,
        }
    }
}

/// One piece of text to be spoken.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub profile: SpeechProfile,
}

/// Platform speech output.
pub trait Announcer {
    /// Whether speech output is usable right now. Unavailable announcers are
    /// skipped silently.
    fn is_available(&self) -> bool {
        true
    }

    /// Stops any announcement in progress.
    fn cancel(&self);

    /// Starts speaking without blocking.
    fn speak(&self, utterance: &Utterance);
}
