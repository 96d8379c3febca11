//! Persisted state shape and its JSON codec.
//!
//! # Responsibility
//! - Define which parts of the store are durable.
//! - Encode durable state into the persisted JSON blob.
//! - Decode the blob back into typed records, tolerating partial damage.
//!
//! # Invariants
//! - The current-routine pointer is never part of the blob.
//! - Decoding never fails: each top-level field and each record is decoded
//!   on its own, and anything unusable falls back to its default.
//! - Nested collections (routine steps, IEP goals, progress entries) are
//!   decoded per child, so one bad child never drops its parent.
//! - Timestamps come back as `DateTime<Utc>` and calendar dates as
//!   `NaiveDate`, never as raw strings.
//! - Decoded routines and day schedules have dense `order` values; decoded
//!   goals have date-sorted progress entries.

use crate::model::date::{date_key, parse_date_key};
use crate::model::emotion::EmotionEntry;
use crate::model::iep::{Iep, IepGoal, IepProgressEntry};
use crate::model::routine::{Routine, RoutineStep};
use crate::model::schedule::{DailySchedule, ScheduleActivity};
use crate::model::settings::AppSettings;
use chrono::NaiveDate;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Store state that survives a restart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DurableState {
    pub settings: AppSettings,
    pub routines: Vec<Routine>,
    /// Newest first.
    pub emotion_history: Vec<EmotionEntry>,
    /// Most recently used first.
    pub recent_symbols: Vec<String>,
    pub daily_schedules: BTreeMap<NaiveDate, DailySchedule>,
    pub ieps: Vec<Iep>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedBlob<'a> {
    #[serde(flatten)]
    settings: &'a AppSettings,
    routines: &'a [Routine],
    emotion_history: &'a [EmotionEntry],
    recent_symbols: &'a [String],
    daily_schedules: BTreeMap<String, &'a DailySchedule>,
    ieps: &'a [Iep],
}

/// Serializes durable state into the persisted JSON blob.
pub fn encode_state(state: &DurableState) -> serde_json::Result<String> {
    let blob = PersistedBlob {
        settings: &state.settings,
        routines: &state.routines,
        emotion_history: &state.emotion_history,
        recent_symbols: &state.recent_symbols,
        daily_schedules: state
            .daily_schedules
            .iter()
            .map(|(date, schedule)| (date_key(*date), schedule))
            .collect(),
        ieps: &state.ieps,
    };
    serde_json::to_string(&blob)
}

/// Rebuilds durable state from a persisted blob.
///
/// Accepts both the bare object and the `{ "state": {...}, "version": n }`
/// envelope written by earlier builds. `recent_symbols_limit` caps the
/// recent-symbol list.
pub fn decode_state(raw: &str, recent_symbols_limit: usize) -> DurableState {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=state_decode module=repo status=fallback reason=invalid_json error={}",
                err
            );
            return DurableState::default();
        }
    };

    let Some(root) = unwrap_envelope(&value) else {
        warn!("event=state_decode module=repo status=fallback reason=not_an_object");
        return DurableState::default();
    };

    DurableState {
        settings: decode_settings(root),
        routines: decode_routines(root.get("routines")),
        emotion_history: decode_records(root.get("emotionHistory"), "emotionHistory"),
        recent_symbols: decode_recent_symbols(root.get("recentSymbols"), recent_symbols_limit),
        daily_schedules: decode_schedules(root.get("dailySchedules")),
        ieps: decode_ieps(root.get("ieps")),
    }
}

fn unwrap_envelope(value: &Value) -> Option<&Map<String, Value>> {
    let root = value.as_object()?;
    match root.get("state").and_then(Value::as_object) {
        Some(inner) if root.contains_key("version") => Some(inner),
        _ => Some(root),
    }
}

fn decode_settings(root: &Map<String, Value>) -> AppSettings {
    let defaults = AppSettings::default();
    AppSettings {
        theme: decode_field(root, "theme").unwrap_or(defaults.theme),
        sound_enabled: decode_field(root, "soundEnabled").unwrap_or(defaults.sound_enabled),
        animations_enabled: decode_field(root, "animationsEnabled")
            .unwrap_or(defaults.animations_enabled),
        text_size: decode_field(root, "textSize").unwrap_or(defaults.text_size),
        auto_speak: decode_field(root, "autoSpeak").unwrap_or(defaults.auto_speak),
    }
}

fn decode_field<T: DeserializeOwned>(root: &Map<String, Value>, name: &'static str) -> Option<T> {
    let value = root.get(name)?;
    match T::deserialize(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!(
                "event=state_decode module=repo status=fallback field={} error={}",
                name, err
            );
            None
        }
    }
}

fn decode_records<T: DeserializeOwned>(value: Option<&Value>, field: &'static str) -> Vec<T> {
    record_items(value, field)
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    "event=state_decode module=repo status=skipped field={} index={} error={}",
                    field, index, err
                );
                None
            }
        })
        .collect()
}

/// Decodes a record whose nested collection under `child` is decoded entry
/// by entry. A bad child is dropped; only a bad parent drops the parent.
fn decode_with_children<P: DeserializeOwned, C: DeserializeOwned>(
    item: &Value,
    child: &'static str,
    field: &'static str,
    index: usize,
) -> Option<(P, Vec<C>)> {
    let Some(object) = item.as_object() else {
        warn!(
            "event=state_decode module=repo status=skipped field={} index={} reason=not_an_object",
            field, index
        );
        return None;
    };
    let mut parent = object.clone();
    let children = parent.remove(child);
    match P::deserialize(Value::Object(parent)) {
        Ok(record) => Some((record, decode_records(children.as_ref(), child))),
        Err(err) => {
            warn!(
                "event=state_decode module=repo status=skipped field={} index={} error={}",
                field, index, err
            );
            None
        }
    }
}

fn decode_routines(value: Option<&Value>) -> Vec<Routine> {
    record_items(value, "routines")
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let (mut routine, steps) =
                decode_with_children::<Routine, RoutineStep>(item, "steps", "routines", index)?;
            routine.steps = steps;
            routine.renumber_steps();
            Some(routine)
        })
        .collect()
}

fn decode_ieps(value: Option<&Value>) -> Vec<Iep> {
    record_items(value, "ieps")
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let (mut iep, goals) =
                decode_with_children::<Iep, Value>(item, "goals", "ieps", index)?;
            iep.goals = goals
                .iter()
                .enumerate()
                .filter_map(|(goal_index, goal)| decode_goal(goal, goal_index))
                .collect();
            Some(iep)
        })
        .collect()
}

fn decode_goal(item: &Value, index: usize) -> Option<IepGoal> {
    let (mut goal, entries) = decode_with_children::<IepGoal, IepProgressEntry>(
        item,
        "progressEntries",
        "ieps.goals",
        index,
    )?;
    goal.progress_entries = entries;
    goal.sort_entries();
    Some(goal)
}

fn record_items<'a>(value: Option<&'a Value>, field: &'static str) -> &'a [Value] {
    match value {
        None => &[],
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => {
            warn!(
                "event=state_decode module=repo status=fallback field={} reason=not_an_array",
                field
            );
            &[]
        }
    }
}

fn decode_recent_symbols(value: Option<&Value>, limit: usize) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    let items = value.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
    for symbol in items.iter().filter_map(Value::as_str) {
        if !symbols.iter().any(|existing| existing == symbol) {
            symbols.push(symbol.to_string());
        }
    }
    symbols.truncate(limit);
    symbols
}

fn decode_schedules(value: Option<&Value>) -> BTreeMap<NaiveDate, DailySchedule> {
    let Some(value) = value else {
        return BTreeMap::new();
    };
    let Some(days) = value.as_object() else {
        warn!(
            "event=state_decode module=repo status=fallback field=dailySchedules reason=not_an_object"
        );
        return BTreeMap::new();
    };

    let mut schedules = BTreeMap::new();
    for (key, day) in days {
        // The map key is authoritative for the day; a mismatching inner
        // `date` is ignored.
        let Some(date) = parse_date_key(key) else {
            warn!(
                "event=state_decode module=repo status=skipped field=dailySchedules reason=invalid_date_key"
            );
            continue;
        };
        let activities =
            decode_records::<ScheduleActivity>(day.get("activities"), "dailySchedules.activities");
        schedules.insert(date, DailySchedule::new(date, activities));
    }
    schedules
}
