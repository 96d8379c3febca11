//! Derived-progress calculations.
//!
//! # Responsibility
//! - Compute completion ratios for routines and daily schedules.
//! - Compute IEP goal progress against a numeric target.
//!
//! # Invariants
//! - Every function is pure and safe to call on every read.
//! - Results are always finite: empty collections and unusable targets yield
//!   `0`, never NaN.

use crate::model::date::date_key;
use crate::model::ids::EntityId;
use crate::model::iep::{Iep, IepGoal};
use crate::model::routine::Routine;
use crate::model::schedule::DailySchedule;
use once_cell::sync::Lazy;
use regex::Regex;

static TARGET_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?|\.[0-9]+").expect("valid target number regex"));
static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("valid leading number regex")
});

/// Completed vs. total count over one checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completion {
    pub completed: usize,
    pub total: usize,
}

impl Completion {
    pub fn from_flags(flags: impl IntoIterator<Item = bool>) -> Self {
        flags
            .into_iter()
            .fold(Self::default(), |acc, completed| Self {
                completed: acc.completed + usize::from(completed),
                total: acc.total + 1,
            })
    }

    /// Completion in `[0, 1]`; `0` for an empty checklist.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }

    /// Completion in `[0, 100]`; `0` for an empty checklist.
    pub fn percent(&self) -> f64 {
        self.ratio() * 100.0
    }

    pub fn is_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

pub fn routine_completion(routine: &Routine) -> Completion {
    Completion::from_flags(routine.steps.iter().map(|step| step.completed))
}

pub fn schedule_completion(schedule: &DailySchedule) -> Completion {
    Completion::from_flags(schedule.activities.iter().map(|activity| activity.completed))
}

/// Extracts the first number embedded in a free-text target.
///
/// `"80% accuracy"` -> `80`, `"3.5 of 5 trials"` -> `3.5`,
/// `"many times a day"` -> `None`.
pub fn extract_target_number(target: &str) -> Option<f64> {
    TARGET_NUMBER_RE
        .find(target)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Numeric threshold a goal is measured against.
///
/// The structured `target_value` wins; otherwise the number embedded in the
/// free-text `target` is used.
pub fn goal_threshold(goal: &IepGoal) -> Option<f64> {
    goal.target_value
        .filter(|value| value.is_finite())
        .or_else(|| extract_target_number(&goal.target))
}

/// Progress of one goal, capped at `100`.
///
/// `min(100, latest / threshold * 100)` where `latest` is the last entry of
/// the date-sorted log. Yields `0` when there are no entries, no threshold,
/// a zero threshold, or a non-finite result.
pub fn goal_progress_percent(goal: &IepGoal) -> f64 {
    let Some(latest) = goal.latest_entry() else {
        return 0.0;
    };
    let Some(threshold) = goal_threshold(goal) else {
        return 0.0;
    };
    if threshold == 0.0 {
        return 0.0;
    }
    let percent = latest.value / threshold * 100.0;
    if !percent.is_finite() {
        return 0.0;
    }
    percent.min(100.0)
}

/// Short human-readable status for one goal.
pub fn goal_progress_summary(goal: &IepGoal) -> String {
    match goal.latest_entry() {
        None => "No progress yet".to_string(),
        Some(entry) => format!("Latest: {} on {}", entry.value, date_key(entry.date)),
    }
}

/// Per-goal percentages of one IEP plus their mean.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IepOverview {
    pub goals: Vec<(EntityId, f64)>,
    /// Mean goal progress; `0` when the IEP has no goals.
    pub average_percent: f64,
}

pub fn iep_progress_overview(iep: &Iep) -> IepOverview {
    let goals: Vec<_> = iep
        .goals
        .iter()
        .map(|goal| (goal.id.clone(), goal_progress_percent(goal)))
        .collect();
    let average_percent = if goals.is_empty() {
        0.0
    } else {
        goals.iter().map(|(_, percent)| percent).sum::<f64>() / goals.len() as f64
    };
    IepOverview {
        goals,
        average_percent,
    }
}

/// Parses user-entered progress values by their leading numeric prefix.
///
/// `"7 correct"` -> `7`, `" 2.5"` -> `2.5`, `"abc"` -> `None`.
pub fn parse_progress_value(input: &str) -> Option<f64> {
    LEADING_NUMBER_RE
        .find(input.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{extract_target_number, parse_progress_value, Completion};

    #[test]
    fn extract_takes_first_number_only() {
        assert_eq!(extract_target_number("80% accuracy"), Some(80.0));
        assert_eq!(extract_target_number("4 of 5 trials at 90%"), Some(4.0));
        assert_eq!(extract_target_number("reach 2.75 wpm"), Some(2.75));
        assert_eq!(extract_target_number("many times a day"), None);
        assert_eq!(extract_target_number("..."), None);
    }

    #[test]
    fn parse_progress_value_reads_leading_prefix() {
        assert_eq!(parse_progress_value("7 correct"), Some(7.0));
        assert_eq!(parse_progress_value("  .5"), Some(0.5));
        assert_eq!(parse_progress_value("-3"), Some(-3.0));
        assert_eq!(parse_progress_value("abc"), None);
        assert_eq!(parse_progress_value(""), None);
    }

    #[test]
    fn empty_completion_is_zero_not_nan() {
        let completion = Completion::from_flags(Vec::<bool>::new());
        assert_eq!(completion.ratio(), 0.0);
        assert_eq!(completion.percent(), 0.0);
        assert!(!completion.is_done());
    }

    #[test]
    fn completion_counts_flags() {
        let completion = Completion::from_flags([true, false, true, true]);
        assert_eq!(completion.completed, 3);
        assert_eq!(completion.total, 4);
        assert_eq!(completion.percent(), 75.0);
    }
}
