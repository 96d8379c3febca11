use super::AppStore;
use crate::model::emotion::{EmotionDraft, EmotionEntry};
use crate::model::ids::EntityId;
use crate::repo::storage::KeyValueStorage;
use chrono::Utc;
use log::debug;

impl<S: KeyValueStorage> AppStore<S> {
    /// Full emotion log, newest first.
    pub fn emotion_history(&self) -> &[EmotionEntry] {
        &self.state.emotion_history
    }

    /// The `count` newest emotion entries.
    pub fn recent_emotions(&self, count: usize) -> &[EmotionEntry] {
        let end = count.min(self.state.emotion_history.len());
        &self.state.emotion_history[..end]
    }

    /// Records an emotion stamped with the current time and returns its id.
    pub fn add_emotion_entry(&mut self, draft: EmotionDraft) -> EntityId {
        let entry = EmotionEntry {
            id: EntityId::generate(),
            emotion: draft.emotion,
            emoji: draft.emoji,
            timestamp: Utc::now(),
            note: draft.note,
        };
        let entry_id = entry.id.clone();
        self.state.emotion_history.insert(0, entry);
        debug!(
            "event=emotion_add module=store status=ok entry_id={} history_len={}",
            entry_id,
            self.state.emotion_history.len()
        );
        self.persist();
        entry_id
    }

    /// Recently used communication symbols, most recent first.
    pub fn recent_symbols(&self) -> &[String] {
        &self.state.recent_symbols
    }

    /// Moves `symbol` to the front of the recent list.
    ///
    /// The list never holds duplicates and is capped at the configured
    /// limit; the oldest symbol falls off first.
    pub fn add_recent_symbol(&mut self, symbol: impl Into<String>) {
        let symbol = symbol.into();
        let symbols = &mut self.state.recent_symbols;
        symbols.retain(|existing| *existing != symbol);
        symbols.insert(0, symbol);
        symbols.truncate(self.config.recent_symbols_limit);
        debug!(
            "event=recent_symbol_add module=store status=ok len={}",
            symbols.len()
        );
        self.persist();
    }
}
