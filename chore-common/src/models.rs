//! Chore board records and the validated chore definition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ChoreField, ValidationErrors};
use crate::schedule::{Frequency, Recurring};
use crate::uuid_utils;

/// Household member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub initials: String,
    pub color: String,
}

/// Roster entry used to seed people (upserted by name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSeed {
    pub name: String,
    pub initials: String,
    pub color: String,
}

impl PersonSeed {
    pub fn new(name: &str, initials: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            initials: initials.to_string(),
            color: color.to_string(),
        }
    }

    /// The two-person household the board ships with
    pub fn default_household() -> Vec<PersonSeed> {
        vec![
            PersonSeed::new("Porter", "P", "#4A80FF"),
            PersonSeed::new("Brickley", "B", "#8B5CF6"),
        ]
    }
}

/// Checklist item owned by exactly one chore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: Uuid,
    pub chore_id: Uuid,
    pub text: String,
    pub order: i64,
}

/// Recurring chore with resolved assignees and ordered subtasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chore {
    pub id: Uuid,
    pub title: String,
    pub frequency: Frequency,
    pub last_done_at: Option<DateTime<Utc>>,
    pub assignees: Vec<Person>,
    pub subtasks: Vec<Subtask>,
}

impl Chore {
    pub fn has_subtask(&self, subtask_id: Uuid) -> bool {
        self.subtasks.iter().any(|s| s.id == subtask_id)
    }
}

impl Recurring for Chore {
    fn frequency(&self) -> Frequency {
        self.frequency
    }

    fn last_done_at(&self) -> Option<DateTime<Utc>> {
        self.last_done_at
    }
}

/// Append-only audit entry written when a chore is finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub id: Uuid,
    pub chore_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub completed_by_person_id: Option<Uuid>,
}

/// Subtask as submitted by the editor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskInput {
    #[serde(default)]
    pub text: String,
}

/// Unvalidated chore definition as it arrives from a client
///
/// Missing fields deserialize to empty values so they surface as field-level
/// validation messages instead of body rejections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoreInput {
    pub title: String,
    pub frequency: String,
    pub assignee_ids: Vec<String>,
    pub subtasks: Vec<SubtaskInput>,
}

impl ChoreInput {
    /// Check every boundary rule, collecting one message per failing field
    pub fn validate(&self) -> Result<NewChore, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = self.title.trim().to_string();
        if title.is_empty() {
            errors.push(ChoreField::Title, "title required");
        }

        let frequency = match self.frequency.parse::<Frequency>() {
            Ok(f) => Some(f),
            Err(_) => {
                errors.push(ChoreField::Frequency, "frequency invalid");
                None
            }
        };

        let mut assignee_ids: Vec<Uuid> = Vec::new();
        let mut malformed = false;
        for raw in &self.assignee_ids {
            match uuid_utils::parse(raw) {
                Ok(id) if !assignee_ids.contains(&id) => assignee_ids.push(id),
                Ok(_) => {}
                Err(_) => malformed = true,
            }
        }
        if malformed {
            errors.push(ChoreField::AssigneeIds, "assignee ids must be UUIDs");
        } else if assignee_ids.is_empty() {
            errors.push(ChoreField::AssigneeIds, "assignees required");
        }

        let subtasks: Vec<String> = self
            .subtasks
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if subtasks.is_empty() {
            errors.push(ChoreField::Subtasks, "subtasks required");
        }

        match frequency {
            Some(frequency) => errors.into_result(NewChore {
                title,
                frequency,
                assignee_ids,
                subtasks,
            }),
            None => Err(errors),
        }
    }
}

/// Chore definition that passed boundary validation
///
/// Used for both create and wholesale replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChore {
    pub title: String,
    pub frequency: Frequency,
    /// Distinct, in submission order
    pub assignee_ids: Vec<Uuid>,
    /// Trimmed, non-empty, in display order
    pub subtasks: Vec<String>,
}
