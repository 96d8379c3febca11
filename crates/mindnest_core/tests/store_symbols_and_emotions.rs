use mindnest_core::{AppStore, EmotionDraft, MemoryStorage, StoreConfig};
use std::collections::HashSet;

#[test]
fn recent_symbols_keep_six_most_recent_first() {
    let mut store = AppStore::in_memory();
    for symbol in ["a", "b", "c", "d", "e", "f", "g"] {
        store.add_recent_symbol(symbol);
    }
    assert_eq!(store.recent_symbols(), ["g", "f", "e", "d", "c", "b"]);
}

#[test]
fn repeated_symbol_moves_to_front_without_duplicates() {
    let mut store = AppStore::in_memory();
    for _ in 0..10 {
        store.add_recent_symbol("water");
    }
    assert_eq!(store.recent_symbols(), ["water"]);

    store.add_recent_symbol("help");
    store.add_recent_symbol("eat");
    store.add_recent_symbol("help");
    assert_eq!(store.recent_symbols(), ["help", "eat", "water"]);
}

#[test]
fn recent_symbol_limit_follows_config() {
    let config = StoreConfig {
        recent_symbols_limit: 2,
        ..StoreConfig::default()
    };
    let mut store = AppStore::open(MemoryStorage::new(), config);
    for symbol in ["yes", "no", "more"] {
        store.add_recent_symbol(symbol);
    }
    assert_eq!(store.recent_symbols(), ["more", "no"]);
}

#[test]
fn zero_symbol_limit_still_keeps_the_latest_symbol() {
    let config = StoreConfig {
        recent_symbols_limit: 0,
        ..StoreConfig::default()
    };
    let mut store = AppStore::open(MemoryStorage::new(), config);
    assert_eq!(store.config().recent_symbols_limit, 1);

    store.add_recent_symbol("yes");
    store.add_recent_symbol("no");
    assert_eq!(store.recent_symbols(), ["no"]);
}

#[test]
fn emotion_entries_are_newest_first_with_unique_ids() {
    let mut store = AppStore::in_memory();
    let first = store.add_emotion_entry(EmotionDraft::new("happy", "😊"));
    let second = store.add_emotion_entry(EmotionDraft::new("sad", "😢").with_note("lost toy"));

    let history = store.emotion_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second);
    assert_eq!(history[0].note.as_deref(), Some("lost toy"));
    assert_eq!(history[1].id, first);
    assert!(history[0].timestamp >= history[1].timestamp);
}

#[test]
fn emotion_ids_do_not_collide_in_a_tight_loop() {
    let mut store = AppStore::in_memory();
    let ids: HashSet<_> = (0..100)
        .map(|_| store.add_emotion_entry(EmotionDraft::new("calm", "😌")))
        .collect();
    assert_eq!(ids.len(), 100);
    assert_eq!(store.recent_emotions(5).len(), 5);
}
