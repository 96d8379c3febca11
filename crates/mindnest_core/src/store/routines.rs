use super::{AppStore, Outcome};
use crate::model::ids::EntityId;
use crate::model::routine::{Routine, RoutinePatch, StepDraft};
use crate::repo::storage::KeyValueStorage;
use chrono::Utc;
use log::debug;

impl<S: KeyValueStorage> AppStore<S> {
    pub fn routines(&self) -> &[Routine] {
        &self.state.routines
    }

    pub fn routine(&self, routine_id: &EntityId) -> Option<&Routine> {
        self.state
            .routines
            .iter()
            .find(|routine| &routine.id == routine_id)
    }

    fn routine_mut(&mut self, routine_id: &EntityId) -> Option<&mut Routine> {
        self.state
            .routines
            .iter_mut()
            .find(|routine| &routine.id == routine_id)
    }

    /// Appends a new routine and returns its id.
    ///
    /// Steps get dense `order` values from their position and start
    /// incomplete. Title and step validation belongs to the caller.
    pub fn add_routine(&mut self, title: impl Into<String>, steps: Vec<StepDraft>) -> EntityId {
        let routine = Routine::new(title, steps, Utc::now());
        let routine_id = routine.id.clone();
        debug!(
            "event=routine_add module=store status=ok routine_id={} steps={}",
            routine_id,
            routine.steps.len()
        );
        self.state.routines.push(routine);
        self.persist();
        routine_id
    }

    pub fn update_routine(&mut self, routine_id: &EntityId, patch: RoutinePatch) -> Outcome {
        let outcome = match self.routine_mut(routine_id) {
            Some(routine) => {
                routine.apply(patch);
                Outcome::Applied
            }
            None => Outcome::NoOp,
        };
        self.commit("routine_update", outcome)
    }

    /// Removes a routine. Clears the current-routine pointer when it pointed
    /// at the removed routine.
    pub fn delete_routine(&mut self, routine_id: &EntityId) -> Outcome {
        let before = self.state.routines.len();
        self.state.routines.retain(|routine| &routine.id != routine_id);
        if self.current_routine_id.as_ref() == Some(routine_id) {
            self.current_routine_id = None;
        }
        let outcome = if self.state.routines.len() < before {
            Outcome::Applied
        } else {
            Outcome::NoOp
        };
        self.commit("routine_delete", outcome)
    }

    /// Marks a routine as the one being worked through, or clears the
    /// pointer with `None`.
    ///
    /// Pointing at an unknown routine is a no-op. The pointer is session
    /// state and is never persisted.
    pub fn set_current_routine(&mut self, routine_id: Option<&EntityId>) -> Outcome {
        match routine_id {
            None => {
                self.current_routine_id = None;
                debug!("event=current_routine_set module=store status=cleared");
                Outcome::Applied
            }
            Some(id) if self.routine(id).is_some() => {
                self.current_routine_id = Some(id.clone());
                debug!(
                    "event=current_routine_set module=store status=ok routine_id={}",
                    id
                );
                Outcome::Applied
            }
            Some(id) => {
                debug!(
                    "event=current_routine_set module=store status=noop routine_id={}",
                    id
                );
                Outcome::NoOp
            }
        }
    }

    /// The current routine, resolved against the routine list.
    pub fn current_routine(&self) -> Option<&Routine> {
        self.current_routine_id
            .as_ref()
            .and_then(|routine_id| self.routine(routine_id))
    }

    pub fn current_routine_id(&self) -> Option<&EntityId> {
        self.current_routine().map(|routine| &routine.id)
    }

    /// Sets one step's completion flag.
    ///
    /// Setting the same value twice leaves the same state. When the last
    /// open step is completed the routine is stamped with `completed_at`;
    /// unchecking any step clears the stamp.
    pub fn update_routine_step(
        &mut self,
        routine_id: &EntityId,
        step_id: &EntityId,
        completed: bool,
    ) -> Outcome {
        let outcome = match self.routine_mut(routine_id) {
            Some(routine) => match routine.steps.iter_mut().find(|step| &step.id == step_id) {
                Some(step) => {
                    step.completed = completed;
                    if !completed {
                        routine.completed_at = None;
                    } else if routine.is_complete() && routine.completed_at.is_none() {
                        routine.completed_at = Some(Utc::now());
                    }
                    Outcome::Applied
                }
                None => Outcome::NoOp,
            },
            None => Outcome::NoOp,
        };
        self.commit("routine_step_update", outcome)
    }
}
