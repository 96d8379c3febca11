use super::{AppStore, Outcome};
use crate::model::ids::EntityId;
use crate::model::iep::{
    GoalDraft, GoalPatch, Iep, IepDraft, IepGoal, IepPatch, IepProgressEntry, ProgressDraft,
};
use crate::repo::storage::KeyValueStorage;
use chrono::Utc;
use log::debug;

impl<S: KeyValueStorage> AppStore<S> {
    pub fn ieps(&self) -> &[Iep] {
        &self.state.ieps
    }

    pub fn iep(&self, iep_id: &EntityId) -> Option<&Iep> {
        self.state.ieps.iter().find(|iep| &iep.id == iep_id)
    }

    pub fn iep_goal(&self, iep_id: &EntityId, goal_id: &EntityId) -> Option<&IepGoal> {
        self.iep(iep_id).and_then(|iep| iep.goal(goal_id))
    }

    fn iep_mut(&mut self, iep_id: &EntityId) -> Option<&mut Iep> {
        self.state.ieps.iter_mut().find(|iep| &iep.id == iep_id)
    }

    fn iep_goal_mut(&mut self, iep_id: &EntityId, goal_id: &EntityId) -> Option<&mut IepGoal> {
        self.iep_mut(iep_id).and_then(|iep| iep.goal_mut(goal_id))
    }

    /// Creates an IEP with no goals and returns its id.
    pub fn add_iep(&mut self, draft: IepDraft) -> EntityId {
        let iep = Iep {
            id: EntityId::generate(),
            student_name: draft.student_name,
            iep_period: draft.iep_period,
            goals: Vec::new(),
            created_at: Utc::now(),
        };
        let iep_id = iep.id.clone();
        self.state.ieps.push(iep);
        debug!("event=iep_add module=store status=ok iep_id={}", iep_id);
        self.persist();
        iep_id
    }

    pub fn update_iep(&mut self, iep_id: &EntityId, patch: IepPatch) -> Outcome {
        let outcome = match self.iep_mut(iep_id) {
            Some(iep) => {
                iep.apply(patch);
                Outcome::Applied
            }
            None => Outcome::NoOp,
        };
        self.commit("iep_update", outcome)
    }

    /// Removes an IEP together with its goals and their progress.
    pub fn delete_iep(&mut self, iep_id: &EntityId) -> Outcome {
        let before = self.state.ieps.len();
        self.state.ieps.retain(|iep| &iep.id != iep_id);
        let outcome = if self.state.ieps.len() < before {
            Outcome::Applied
        } else {
            Outcome::NoOp
        };
        self.commit("iep_delete", outcome)
    }

    /// Appends a goal to an IEP. Returns `None` when the IEP is unknown.
    ///
    /// A non-finite structured target is dropped; the free-text target is
    /// kept as given.
    pub fn add_iep_goal(&mut self, iep_id: &EntityId, mut draft: GoalDraft) -> Option<EntityId> {
        draft.target_value = draft.target_value.filter(|value| value.is_finite());
        let Some(iep) = self.iep_mut(iep_id) else {
            self.commit("iep_goal_add", Outcome::NoOp);
            return None;
        };
        let goal = IepGoal::from_draft(draft, Utc::now());
        let goal_id = goal.id.clone();
        iep.goals.push(goal);
        debug!(
            "event=iep_goal_add module=store status=ok iep_id={} goal_id={}",
            iep_id, goal_id
        );
        self.persist();
        Some(goal_id)
    }

    pub fn update_iep_goal(
        &mut self,
        iep_id: &EntityId,
        goal_id: &EntityId,
        mut patch: GoalPatch,
    ) -> Outcome {
        if let Some(Some(value)) = patch.target_value {
            if !value.is_finite() {
                patch.target_value = Some(None);
            }
        }
        let outcome = match self.iep_goal_mut(iep_id, goal_id) {
            Some(goal) => {
                goal.apply(patch);
                Outcome::Applied
            }
            None => Outcome::NoOp,
        };
        self.commit("iep_goal_update", outcome)
    }

    pub fn delete_iep_goal(&mut self, iep_id: &EntityId, goal_id: &EntityId) -> Outcome {
        let outcome = match self.iep_mut(iep_id) {
            Some(iep) => {
                let before = iep.goals.len();
                iep.goals.retain(|goal| &goal.id != goal_id);
                if iep.goals.len() < before {
                    Outcome::Applied
                } else {
                    Outcome::NoOp
                }
            }
            None => Outcome::NoOp,
        };
        self.commit("iep_goal_delete", outcome)
    }

    /// Records a measurement against a goal and returns the entry id.
    ///
    /// The goal's log is re-sorted by date after every append, so entries
    /// added out of order read back chronologically. Returns `None` when the
    /// IEP or goal is unknown, or when `value` is not a finite number.
    pub fn add_iep_progress_entry(
        &mut self,
        iep_id: &EntityId,
        goal_id: &EntityId,
        draft: ProgressDraft,
    ) -> Option<EntityId> {
        if !draft.value.is_finite() {
            debug!(
                "event=iep_progress_add module=store status=rejected reason=non_finite_value goal_id={}",
                goal_id
            );
            return None;
        }
        let Some(goal) = self.iep_goal_mut(iep_id, goal_id) else {
            self.commit("iep_progress_add", Outcome::NoOp);
            return None;
        };
        let entry = IepProgressEntry {
            id: EntityId::generate(),
            date: draft.date,
            value: draft.value,
            notes: draft.notes,
            timestamp: Utc::now(),
        };
        let entry_id = entry.id.clone();
        goal.push_entry(entry);
        debug!(
            "event=iep_progress_add module=store status=ok goal_id={} entry_id={} entries={}",
            goal_id,
            entry_id,
            goal.progress_entries.len()
        );
        self.persist();
        Some(entry_id)
    }
}
