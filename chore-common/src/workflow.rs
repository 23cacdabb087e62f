//! Checklist gate and completion workflow
//!
//! Each chore carries an ephemeral set of checked subtask ids. A chore can only
//! be finished once every one of its subtasks is checked; finishing or editing
//! the chore empties the set again, deleting it drops the set.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::ChoreStore;
use crate::models::{Chore, ChoreInput, Completion};
use crate::{Error, Result};

/// Where a chore stands in its checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChecklistPhase {
    /// Fewer subtasks checked than exist
    InProgress,
    /// Every subtask checked; finishing is allowed
    Ready,
}

/// Checklist summary for one chore
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistProgress {
    pub chore_id: Uuid,
    /// Checked subtask ids in display order
    pub checked: Vec<Uuid>,
    pub checked_count: usize,
    pub total: usize,
    pub phase: ChecklistPhase,
}

/// Session-local checked-subtask sets keyed by chore id
#[derive(Debug, Clone, Default)]
pub struct ChecklistState {
    checked: HashMap<Uuid, HashSet<Uuid>>,
}

impl ChecklistState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one subtask; returns whether it is now checked
    pub fn toggle(&mut self, chore_id: Uuid, subtask_id: Uuid) -> bool {
        let set = self.checked.entry(chore_id).or_default();
        if set.remove(&subtask_id) {
            false
        } else {
            set.insert(subtask_id);
            true
        }
    }

    pub fn is_checked(&self, chore_id: Uuid, subtask_id: Uuid) -> bool {
        self.checked
            .get(&chore_id)
            .is_some_and(|set| set.contains(&subtask_id))
    }

    pub fn checked_count(&self, chore_id: Uuid) -> usize {
        self.checked.get(&chore_id).map_or(0, HashSet::len)
    }

    /// Ready iff the chore has subtasks and exactly those subtasks are checked
    pub fn is_ready(&self, chore: &Chore) -> bool {
        let total = chore.subtasks.len();
        total > 0
            && self.checked_count(chore.id) == total
            && chore.subtasks.iter().all(|s| self.is_checked(chore.id, s.id))
    }

    pub fn progress(&self, chore: &Chore) -> ChecklistProgress {
        let checked: Vec<Uuid> = chore
            .subtasks
            .iter()
            .filter(|s| self.is_checked(chore.id, s.id))
            .map(|s| s.id)
            .collect();
        let phase = if self.is_ready(chore) {
            ChecklistPhase::Ready
        } else {
            ChecklistPhase::InProgress
        };
        ChecklistProgress {
            chore_id: chore.id,
            checked_count: self.checked_count(chore.id),
            total: chore.subtasks.len(),
            checked,
            phase,
        }
    }

    /// Empty the chore's set (after a completion or an edit)
    pub fn reset(&mut self, chore_id: Uuid) {
        self.checked.insert(chore_id, HashSet::new());
    }

    /// Drop the chore's entry entirely (after a delete)
    pub fn forget(&mut self, chore_id: Uuid) {
        self.checked.remove(&chore_id);
    }

    pub fn is_tracked(&self, chore_id: Uuid) -> bool {
        self.checked.contains_key(&chore_id)
    }
}

/// Result of a finish request
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    /// Completion persisted and checklist reset
    Completed(Completion),
    /// Not every subtask was checked; nothing changed
    NotReady(ChecklistProgress),
}

/// Editing and completion workflow over a persistence collaborator
pub struct ChoreWorkflow<S> {
    store: S,
    checklist: Mutex<ChecklistState>,
}

impl<S: ChoreStore> ChoreWorkflow<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            checklist: Mutex::new(ChecklistState::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Copy of the current checklist state, for rendering a board pass
    pub async fn checklist(&self) -> ChecklistState {
        self.checklist.lock().await.clone()
    }

    pub async fn progress(&self, chore_id: Uuid) -> Result<ChecklistProgress> {
        let chore = self.store.get_chore(chore_id).await?;
        Ok(self.checklist.lock().await.progress(&chore))
    }

    /// Check or uncheck one of the chore's subtasks
    ///
    /// The checklist lock is held across the chore read so a concurrent edit
    /// cannot swap the subtasks between the membership check and the toggle.
    pub async fn toggle(&self, chore_id: Uuid, subtask_id: Uuid) -> Result<ChecklistProgress> {
        let mut checklist = self.checklist.lock().await;
        let chore = self.store.get_chore(chore_id).await?;
        if !chore.has_subtask(subtask_id) {
            return Err(Error::NotFound(format!(
                "subtask {} on chore {}",
                subtask_id, chore_id
            )));
        }

        let now_checked = checklist.toggle(chore_id, subtask_id);
        debug!(
            "Subtask {} on chore {} {}",
            subtask_id,
            chore_id,
            if now_checked { "checked" } else { "unchecked" }
        );
        Ok(checklist.progress(&chore))
    }

    /// Mark the chore done at `now` if its checklist is complete
    ///
    /// Finishing an incomplete checklist is a no-op, not an error.
    pub async fn finish(
        &self,
        chore_id: Uuid,
        completed_by: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<FinishOutcome> {
        let mut checklist = self.checklist.lock().await;
        let chore = self.store.get_chore(chore_id).await?;

        if !checklist.is_ready(&chore) {
            let progress = checklist.progress(&chore);
            debug!(
                "Finish ignored for chore {}: {}/{} subtasks checked",
                chore_id, progress.checked_count, progress.total
            );
            return Ok(FinishOutcome::NotReady(progress));
        }

        let completion = self
            .store
            .record_completion(chore_id, now, completed_by)
            .await?;
        checklist.reset(chore_id);
        info!("Chore {} ({}) completed at {}", chore.title, chore_id, now);
        Ok(FinishOutcome::Completed(completion))
    }

    pub async fn create(&self, input: &ChoreInput) -> Result<Chore> {
        let new_chore = input.validate()?;
        let chore = self.store.create_chore(&new_chore).await?;
        info!("Created chore {} ({})", chore.title, chore.id);
        Ok(chore)
    }

    /// Replace the chore wholesale and empty its checklist
    pub async fn edit(&self, chore_id: Uuid, input: &ChoreInput) -> Result<Chore> {
        let new_chore = input.validate()?;
        let mut checklist = self.checklist.lock().await;
        let chore = self.store.replace_chore(chore_id, &new_chore).await?;
        checklist.reset(chore_id);
        info!("Updated chore {} ({})", chore.title, chore.id);
        Ok(chore)
    }

    pub async fn delete(&self, chore_id: Uuid) -> Result<()> {
        let mut checklist = self.checklist.lock().await;
        self.store.delete_chore(chore_id).await?;
        checklist.forget(chore_id);
        info!("Deleted chore {}", chore_id);
        Ok(())
    }
}
