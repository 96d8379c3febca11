//! Process-wide application settings.
//!
//! # Invariants
//! - Settings are changed only by partial-patch merge; absent patch fields
//!   leave the current value untouched.
//! - No validation beyond the type system is applied.

use serde::{Deserialize, Serialize};

/// Colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    HighContrast,
}

/// Base text size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Current settings snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: Theme,
    /// Master switch for speech output.
    pub sound_enabled: bool,
    pub animations_enabled: bool,
    pub text_size: TextSize,
    /// Speak selections automatically without an explicit "read aloud" tap.
    pub auto_speak: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            sound_enabled: true,
            animations_enabled: true,
            text_size: TextSize::Medium,
            auto_speak: true,
        }
    }
}

/// Partial settings update. `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub sound_enabled: Option<bool>,
    pub animations_enabled: Option<bool>,
    pub text_size: Option<TextSize>,
    pub auto_speak: Option<bool>,
}

impl SettingsPatch {
    /// Patch restoring display and sound defaults.
    ///
    /// `auto_speak` is left as is.
    pub fn reset_defaults() -> Self {
        let defaults = AppSettings::default();
        Self {
            theme: Some(defaults.theme),
            sound_enabled: Some(defaults.sound_enabled),
            animations_enabled: Some(defaults.animations_enabled),
            text_size: Some(defaults.text_size),
            auto_speak: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AppSettings {
    /// Shallow-merges `patch` into these settings.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(sound_enabled) = patch.sound_enabled {
            self.sound_enabled = sound_enabled;
        }
        if let Some(animations_enabled) = patch.animations_enabled {
            self.animations_enabled = animations_enabled;
        }
        if let Some(text_size) = patch.text_size {
            self.text_size = text_size;
        }
        if let Some(auto_speak) = patch.auto_speak {
            self.auto_speak = auto_speak;
        }
    }
}
