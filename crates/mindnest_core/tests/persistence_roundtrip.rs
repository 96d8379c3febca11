use chrono::NaiveDate;
use mindnest_core::db::open_db;
use mindnest_core::{
    ActivityDraft, AppStore, EmotionDraft, GoalDraft, IepDraft, KeyValueStorage, LoadSource,
    MemoryStorage, ProgressDraft, SettingsPatch, SqliteStorage, StepDraft, StoreConfig, TextSize,
    Theme,
};

const KEY: &str = "mindnest-storage";

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

#[test]
fn first_run_starts_from_defaults() {
    let store = AppStore::in_memory();
    assert_eq!(store.load_source(), LoadSource::Empty);
    assert!(store.routines().is_empty());
    assert_eq!(store.settings().theme, Theme::Light);
    assert!(store.settings().auto_speak);
}

#[test]
fn reload_restores_typed_records_but_not_current_routine() {
    let mut store = AppStore::in_memory();
    let routine_id = store.add_routine("Morning", vec![StepDraft::new("Wake", "⏰")]);
    store.set_current_routine(Some(&routine_id));
    store.add_emotion_entry(EmotionDraft::new("happy", "😊"));
    store.add_recent_symbol("water");
    store.add_schedule_activity(date("2024-06-01"), ActivityDraft::new("School", "🏫").at("08:00"));
    let iep_id = store.add_iep(IepDraft::new("Sam", "2024"));
    let goal_id = store.add_iep_goal(&iep_id, GoalDraft::new("Read", "10 pages")).unwrap();
    store.add_iep_progress_entry(&iep_id, &goal_id, ProgressDraft::new(date("2024-02-01"), 4.0));
    store.update_settings(SettingsPatch {
        theme: Some(Theme::HighContrast),
        text_size: Some(TextSize::Large),
        ..SettingsPatch::default()
    });

    let original = store.durable_state().clone();
    let original_timestamp = store.emotion_history()[0].timestamp;
    let storage = store.into_storage();

    let reloaded = AppStore::open(storage, StoreConfig::default());
    assert_eq!(reloaded.load_source(), LoadSource::Restored);
    assert_eq!(reloaded.durable_state(), &original);
    assert!(reloaded.current_routine().is_none());

    // Timestamps come back as real instants, comparable with fresh ones.
    let timestamp = reloaded.emotion_history()[0].timestamp;
    assert_eq!(timestamp, original_timestamp);
    assert!(timestamp <= chrono::Utc::now());
    assert_eq!(reloaded.settings().theme, Theme::HighContrast);
    assert!(reloaded.get_daily_schedule(date("2024-06-01")).is_some());
}

#[test]
fn persisted_blob_uses_camel_case_and_date_keys() {
    let mut store = AppStore::in_memory();
    let routine_id = store.add_routine("Morning", vec![StepDraft::new("Wake", "⏰")]);
    store.set_current_routine(Some(&routine_id));
    store.add_schedule_activity(date("2024-06-01"), ActivityDraft::new("School", "🏫"));

    let raw = store.storage().get(KEY).unwrap().unwrap();
    let blob: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(blob["theme"], "light");
    assert_eq!(blob["soundEnabled"], true);
    assert!(blob["dailySchedules"]["2024-06-01"]["activities"].is_array());
    assert!(blob["routines"][0]["createdAt"].is_string());
    assert!(blob.get("currentRoutine").is_none());
}

#[test]
fn corrupt_blob_falls_back_to_defaults() {
    let storage = MemoryStorage::with_entry(KEY, "{not json");
    let store = AppStore::open(storage, StoreConfig::default());
    assert_eq!(store.load_source(), LoadSource::Restored);
    assert!(store.routines().is_empty());
    assert_eq!(store.settings().theme, Theme::Light);
}

#[test]
fn one_malformed_record_does_not_discard_the_rest() {
    let raw = r#"{
        "theme": "dark",
        "emotionHistory": [
            {"id": "1", "emotion": "happy", "emoji": "😊", "timestamp": "2024-05-01T10:00:00Z"},
            {"id": "2", "emotion": "sad", "emoji": "😢", "timestamp": "yesterday"}
        ],
        "recentSymbols": ["a", "b"]
    }"#;
    let store = AppStore::open(MemoryStorage::with_entry(KEY, raw), StoreConfig::default());
    assert_eq!(store.settings().theme, Theme::Dark);
    assert_eq!(store.emotion_history().len(), 1);
    assert_eq!(store.emotion_history()[0].id, "1");
    assert_eq!(store.recent_symbols(), ["a", "b"]);
}

#[test]
fn null_progress_value_drops_only_that_entry() {
    let raw = r#"{
        "state": {
            "ieps": [{
                "id": "1700000000000",
                "studentName": "Sam",
                "iepPeriod": "2024-2025",
                "createdAt": "2024-01-02T10:00:00.000Z",
                "goals": [
                    {
                        "id": "g1",
                        "title": "Reading",
                        "target": "80% accuracy",
                        "createdAt": "2024-01-02T10:00:00.000Z",
                        "progressEntries": [
                            {"id": "e1", "date": "2024-02-01", "value": 60, "timestamp": "2024-02-01T09:00:00.000Z"}
                        ]
                    },
                    {
                        "id": "g2",
                        "title": "Math",
                        "target": "5 problems",
                        "createdAt": "2024-01-02T10:00:00.000Z",
                        "progressEntries": [
                            {"id": "e2", "date": "2024-03-01", "value": 4, "timestamp": "2024-03-01T09:00:00.000Z"},
                            {"id": "e3", "date": "2024-02-15", "value": null, "timestamp": "2024-02-15T09:00:00.000Z"}
                        ]
                    }
                ]
            }]
        },
        "version": 0
    }"#;
    let store = AppStore::open(MemoryStorage::with_entry(KEY, raw), StoreConfig::default());

    assert_eq!(store.ieps().len(), 1);
    let iep = &store.ieps()[0];
    assert_eq!(iep.goals.len(), 2);
    assert_eq!(iep.goals[0].progress_entries.len(), 1);
    let math = &iep.goals[1];
    assert_eq!(math.progress_entries.len(), 1);
    assert_eq!(math.progress_entries[0].id, "e2");
    assert_eq!(math.progress_entries[0].value, 4.0);
}

#[test]
fn malformed_goal_is_dropped_without_losing_its_iep() {
    let raw = r#"{
        "ieps": [{
            "id": "i1",
            "studentName": "Ana",
            "iepPeriod": "Fall",
            "createdAt": "2024-09-01T10:00:00Z",
            "goals": [
                {"id": "g1", "title": "Words", "createdAt": "2024-09-01T10:00:00Z"},
                {
                    "id": "g2",
                    "title": "Signs",
                    "target": "10 signs",
                    "createdAt": "2024-09-01T10:00:00Z",
                    "progressEntries": [
                        {"id": "e2", "date": "2024-10-01", "value": 5, "timestamp": "2024-10-01T09:00:00Z"},
                        {"id": "e1", "date": "not a date", "value": 2, "timestamp": "2024-09-15T09:00:00Z"},
                        {"id": "e0", "date": "2024-09-15", "value": 2, "timestamp": "2024-09-15T09:00:00Z"}
                    ]
                }
            ]
        }]
    }"#;
    let store = AppStore::open(MemoryStorage::with_entry(KEY, raw), StoreConfig::default());

    let iep = &store.ieps()[0];
    assert_eq!(iep.goals.len(), 1);
    let goal = &iep.goals[0];
    assert_eq!(goal.id, "g2");
    let ids: Vec<&str> = goal.progress_entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e0", "e2"]);
}

#[test]
fn legacy_envelope_with_timestamp_ids_is_accepted() {
    let raw = r#"{
        "state": {
            "routines": [{
                "id": "1717171717171",
                "title": "Bedtime",
                "steps": [
                    {"id": "bath", "title": "Bath", "emoji": "🛁", "completed": true, "order": 4},
                    {"id": "story", "title": "Story", "emoji": "📖", "completed": false, "order": 9}
                ],
                "createdAt": "2024-05-31T19:00:00.000Z"
            }],
            "dailySchedules": {
                "2024-06-01": {"date": "2024-06-01T00:00:00.000Z", "activities": []}
            },
            "currentRoutine": {"id": "1717171717171"}
        },
        "version": 0
    }"#;
    let store = AppStore::open(MemoryStorage::with_entry(KEY, raw), StoreConfig::default());

    let routine = &store.routines()[0];
    assert_eq!(routine.id, "1717171717171");
    let orders: Vec<u32> = routine.steps.iter().map(|step| step.order).collect();
    assert_eq!(orders, vec![0, 1]);
    assert!(store.current_routine().is_none());
    let day = store.get_daily_schedule(date("2024-06-01")).unwrap();
    assert_eq!(day.date, date("2024-06-01"));
}

#[test]
fn sqlite_storage_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mindnest.db");

    {
        let conn = open_db(&path).unwrap();
        let storage = SqliteStorage::try_new(&conn).unwrap();
        let mut store = AppStore::open(storage, StoreConfig::default());
        store.add_recent_symbol("hello");
        store.add_emotion_entry(EmotionDraft::new("proud", "🌟"));
        assert_eq!(store.persist_failures(), 0);
    }

    let conn = open_db(&path).unwrap();
    let storage = SqliteStorage::try_new(&conn).unwrap();
    let store = AppStore::open(storage, StoreConfig::default());
    assert_eq!(store.load_source(), LoadSource::Restored);
    assert_eq!(store.recent_symbols(), ["hello"]);
    assert_eq!(store.emotion_history()[0].emotion, "proud");
}

#[test]
fn reset_all_clears_collections_and_persists() {
    let mut store = AppStore::in_memory();
    store.add_recent_symbol("x");
    store.update_settings(SettingsPatch {
        theme: Some(Theme::Dark),
        ..SettingsPatch::default()
    });
    store.reset_all();

    assert!(store.recent_symbols().is_empty());
    assert_eq!(store.settings().theme, Theme::Light);

    let reloaded = AppStore::open(store.into_storage(), StoreConfig::default());
    assert!(reloaded.recent_symbols().is_empty());
    assert_eq!(reloaded.settings().theme, Theme::Light);
}

struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn get(&self, _key: &str) -> mindnest_core::StorageResult<Option<String>> {
        Err(mindnest_core::StorageError::Unavailable("offline".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> mindnest_core::StorageResult<()> {
        Err(mindnest_core::StorageError::Unavailable("quota exceeded".into()))
    }

    fn remove(&self, _key: &str) -> mindnest_core::StorageResult<()> {
        Ok(())
    }
}

#[test]
fn storage_failures_are_counted_and_state_is_kept() {
    let mut store = AppStore::open(FailingStorage, StoreConfig::default());
    assert_eq!(store.load_source(), LoadSource::StorageFailed);

    store.add_recent_symbol("a");
    store.add_recent_symbol("b");

    assert_eq!(store.persist_failures(), 2);
    assert_eq!(store.recent_symbols(), ["b", "a"]);
}
