use mindnest_core::{
    Announcer, AppStore, MemoryStorage, SettingsPatch, SpeechProfile, StoreConfig, TextSize,
    Theme, Utterance,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Cancel,
    Speak(Utterance),
}

#[derive(Clone, Default)]
struct RecordingAnnouncer {
    calls: Rc<RefCell<Vec<Call>>>,
    unavailable: bool,
}

impl Announcer for RecordingAnnouncer {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn cancel(&self) {
        self.calls.borrow_mut().push(Call::Cancel);
    }

    fn speak(&self, utterance: &Utterance) {
        self.calls.borrow_mut().push(Call::Speak(utterance.clone()));
    }
}

fn store_with(announcer: &RecordingAnnouncer) -> AppStore<MemoryStorage> {
    AppStore::in_memory().with_announcer(Box::new(announcer.clone()))
}

#[test]
fn speak_cancels_then_speaks_with_profile() {
    let announcer = RecordingAnnouncer::default();
    let store = store_with(&announcer);

    store.speak("Time to brush teeth");
    store.speak("Great job");

    let calls = announcer.calls.borrow();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], Call::Cancel);
    assert_eq!(
        calls[1],
        Call::Speak(Utterance {
            text: "Time to brush teeth".into(),
            profile: SpeechProfile::default(),
        })
    );
    assert_eq!(calls[2], Call::Cancel);
    match &calls[3] {
        Call::Speak(utterance) => {
            assert_eq!(utterance.text, "Great job");
            assert_eq!(utterance.profile.rate, 0.8);
            assert_eq!(utterance.profile.pitch, 1.1);
            assert_eq!(utterance.profile.volume, 0.8);
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[test]
fn speak_is_skipped_when_sound_disabled() {
    let announcer = RecordingAnnouncer::default();
    let mut store = store_with(&announcer);
    store.update_settings(SettingsPatch {
        sound_enabled: Some(false),
        ..SettingsPatch::default()
    });

    store.speak("hello");
    assert!(announcer.calls.borrow().is_empty());
}

#[test]
fn speak_is_skipped_without_usable_announcer() {
    let store = AppStore::in_memory();
    store.speak("nobody listening");

    let announcer = RecordingAnnouncer {
        unavailable: true,
        ..RecordingAnnouncer::default()
    };
    let store = store_with(&announcer);
    store.speak("hello");
    assert!(announcer.calls.borrow().is_empty());
}

#[test]
fn announce_if_auto_respects_auto_speak() {
    let announcer = RecordingAnnouncer::default();
    let mut store = store_with(&announcer);

    store.announce_if_auto("first");
    assert_eq!(announcer.calls.borrow().len(), 2);

    store.update_settings(SettingsPatch {
        auto_speak: Some(false),
        ..SettingsPatch::default()
    });
    store.announce_if_auto("second");
    assert_eq!(announcer.calls.borrow().len(), 2);

    store.speak("explicit");
    assert_eq!(announcer.calls.borrow().len(), 4);
}

#[test]
fn configured_speech_profile_is_used() {
    let announcer = RecordingAnnouncer::default();
    let config = StoreConfig {
        speech: SpeechProfile {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        },
        ..StoreConfig::default()
    };
    let store =
        AppStore::open(MemoryStorage::new(), config).with_announcer(Box::new(announcer.clone()));

    store.speak("hi");
    let calls = announcer.calls.borrow();
    match &calls[1] {
        Call::Speak(utterance) => assert_eq!(utterance.profile.rate, 1.0),
        other => panic!("unexpected call: {other:?}"),
    }
}

#[test]
fn reset_settings_keeps_auto_speak() {
    let mut store = AppStore::in_memory();
    store.update_settings(SettingsPatch {
        theme: Some(Theme::Dark),
        sound_enabled: Some(false),
        animations_enabled: Some(false),
        text_size: Some(TextSize::Small),
        auto_speak: Some(false),
    });

    store.reset_settings();

    let settings = store.settings();
    assert_eq!(settings.theme, Theme::Light);
    assert!(settings.sound_enabled);
    assert!(settings.animations_enabled);
    assert_eq!(settings.text_size, TextSize::Medium);
    assert!(!settings.auto_speak);
}
