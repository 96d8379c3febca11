use super::{AppStore, Outcome};
use crate::model::settings::{AppSettings, SettingsPatch};
use crate::repo::storage::KeyValueStorage;
use crate::speech::Utterance;
use log::debug;

impl<S: KeyValueStorage> AppStore<S> {
    pub fn settings(&self) -> &AppSettings {
        &self.state.settings
    }

    /// Shallow-merges `patch` into the settings.
    ///
    /// An empty patch changes nothing and is not persisted.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Outcome {
        let outcome = if patch.is_empty() {
            Outcome::NoOp
        } else {
            self.state.settings.apply(&patch);
            Outcome::Applied
        };
        self.commit("settings_update", outcome)
    }

    /// Restores theme, sound, animations and text size. `auto_speak` keeps
    /// its current value.
    pub fn reset_settings(&mut self) -> Outcome {
        self.update_settings(SettingsPatch::reset_defaults())
    }

    /// Speaks `text` through the attached announcer, interrupting anything
    /// already playing.
    ///
    /// Silently does nothing when sound is disabled, no announcer is
    /// attached, or the announcer reports itself unavailable.
    pub fn speak(&self, text: &str) {
        if !self.state.settings.sound_enabled {
            debug!("event=speak module=store status=skipped reason=sound_disabled");
            return;
        }
        let Some(announcer) = self.announcer.as_deref() else {
            debug!("event=speak module=store status=skipped reason=no_announcer");
            return;
        };
        if !announcer.is_available() {
            debug!("event=speak module=store status=skipped reason=unavailable");
            return;
        }

        announcer.cancel();
        announcer.speak(&Utterance {
            text: text.to_string(),
            profile: self.config.speech,
        });
        debug!(
            "event=speak module=store status=ok chars={}",
            text.chars().count()
        );
    }

    /// Speaks `text` only when auto-speak is on.
    pub fn announce_if_auto(&self, text: &str) {
        if self.state.settings.auto_speak {
            self.speak(text);
        }
    }
}
