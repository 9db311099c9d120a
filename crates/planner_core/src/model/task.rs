//! Task: an actionable item owned by exactly one Project.

use crate::model::meta::{EntityKind, EntityMeta, ProjectId, TaskId};
use crate::model::validation::{normalize_name, normalize_optional_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Stored Task snapshot. `project_id` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub project_id: ProjectId,
    pub notes: Option<String>,
}

/// Partial update for a Task. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub notes: Option<String>,
}

impl Task {
    pub fn new(
        name: &str,
        project_id: ProjectId,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            meta: EntityMeta::issue(),
            name: normalize_name(EntityKind::Task, name)?,
            project_id,
            notes: normalize_optional_text(notes),
        })
    }

    pub fn id(&self) -> TaskId {
        self.meta.id
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        normalize_name(EntityKind::Task, &self.name).map(|_| ())
    }

    pub fn apply(&mut self, patch: &TaskPatch) -> Result<(), ValidationError> {
        let name = patch
            .name
            .as_deref()
            .map(|value| normalize_name(EntityKind::Task, value))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(notes) = &patch.notes {
            self.notes = normalize_optional_text(Some(notes.clone()));
        }
        self.meta.touch();
        Ok(())
    }
}
