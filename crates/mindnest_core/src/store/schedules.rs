use super::{AppStore, Outcome};
use crate::model::date::local_today;
use crate::model::ids::EntityId;
use crate::model::schedule::{
    ActivityDraft, ActivityPatch, DailySchedule, MoveDirection, ScheduleActivity,
};
use crate::repo::storage::KeyValueStorage;
use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeMap;

impl<S: KeyValueStorage> AppStore<S> {
    /// Every stored day, ordered by date.
    pub fn daily_schedules(&self) -> &BTreeMap<NaiveDate, DailySchedule> {
        &self.state.daily_schedules
    }

    /// The schedule for `date`, if one was ever saved.
    pub fn get_daily_schedule(&self, date: NaiveDate) -> Option<&DailySchedule> {
        self.state.daily_schedules.get(&date)
    }

    /// The schedule for the current local calendar date.
    pub fn todays_schedule(&self) -> Option<&DailySchedule> {
        self.get_daily_schedule(local_today())
    }

    /// Replaces the whole activity list for `date`. Other days are untouched.
    ///
    /// Activities are ordered by their `order` (ties keep input order) and
    /// then renumbered densely. An empty list still leaves an entry for the
    /// day.
    pub fn add_or_update_daily_schedule(
        &mut self,
        date: NaiveDate,
        activities: Vec<ScheduleActivity>,
    ) {
        let schedule = DailySchedule::new(date, activities);
        debug!(
            "event=schedule_save module=store status=ok date={} activities={}",
            date,
            schedule.activities.len()
        );
        self.state.daily_schedules.insert(date, schedule);
        self.persist();
    }

    /// Removes the entry for `date` entirely.
    pub fn clear_daily_schedule(&mut self, date: NaiveDate) -> Outcome {
        let outcome = match self.state.daily_schedules.remove(&date) {
            Some(_) => Outcome::Applied,
            None => Outcome::NoOp,
        };
        self.commit("schedule_clear", outcome)
    }

    /// Appends one activity to `date`, creating the day when absent, and
    /// returns the new activity id.
    pub fn add_schedule_activity(&mut self, date: NaiveDate, draft: ActivityDraft) -> EntityId {
        let schedule = self
            .state
            .daily_schedules
            .entry(date)
            .or_insert_with(|| DailySchedule::new(date, Vec::new()));
        let activity = ScheduleActivity::from_draft(draft, schedule.activities.len() as u32);
        let activity_id = activity.id.clone();
        schedule.activities.push(activity);
        debug!(
            "event=schedule_activity_add module=store status=ok date={} activity_id={}",
            date, activity_id
        );
        self.persist();
        activity_id
    }

    /// Patches one activity of `date`. Unknown day or activity is a no-op.
    pub fn update_schedule_activity(
        &mut self,
        date: NaiveDate,
        activity_id: &EntityId,
        patch: ActivityPatch,
    ) -> Outcome {
        let activity = self
            .state
            .daily_schedules
            .get_mut(&date)
            .and_then(|schedule| {
                schedule
                    .activities
                    .iter_mut()
                    .find(|activity| &activity.id == activity_id)
            });
        let outcome = match activity {
            Some(activity) => {
                activity.apply(patch);
                Outcome::Applied
            }
            None => Outcome::NoOp,
        };
        self.commit("schedule_activity_update", outcome)
    }

    /// Drops one activity and closes the gap in `order`.
    pub fn remove_schedule_activity(&mut self, date: NaiveDate, activity_id: &EntityId) -> Outcome {
        let outcome = match self.state.daily_schedules.get_mut(&date) {
            Some(schedule) => match schedule.position(activity_id) {
                Some(index) => {
                    schedule.activities.remove(index);
                    schedule.renumber();
                    Outcome::Applied
                }
                None => Outcome::NoOp,
            },
            None => Outcome::NoOp,
        };
        self.commit("schedule_activity_remove", outcome)
    }

    /// Swaps an activity with its neighbour. Moving past either end is a
    /// no-op.
    pub fn move_schedule_activity(
        &mut self,
        date: NaiveDate,
        activity_id: &EntityId,
        direction: MoveDirection,
    ) -> Outcome {
        let moved = self
            .state
            .daily_schedules
            .get_mut(&date)
            .is_some_and(|schedule| schedule.move_activity(activity_id, direction));
        let outcome = if moved {
            Outcome::Applied
        } else {
            Outcome::NoOp
        };
        self.commit("schedule_activity_move", outcome)
    }
}
