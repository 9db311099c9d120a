//! Project: a body of work owned by exactly one Area.

use crate::model::meta::{AreaId, EntityKind, EntityMeta, ProjectId};
use crate::model::validation::{normalize_name, normalize_optional_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Stored Project snapshot.
///
/// `area_id` is fixed at creation; no patch can move a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub area_id: AreaId,
    pub notes: Option<String>,
}

/// Partial update for a Project. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    /// `Some("")` clears the notes.
    pub notes: Option<String>,
}

impl Project {
    pub fn new(
        name: &str,
        area_id: AreaId,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            meta: EntityMeta::issue(),
            name: normalize_name(EntityKind::Project, name)?,
            area_id,
            notes: normalize_optional_text(notes),
        })
    }

    pub fn id(&self) -> ProjectId {
        self.meta.id
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        normalize_name(EntityKind::Project, &self.name).map(|_| ())
    }

    /// Applies a patch and advances `updated_at`.
    pub fn apply(&mut self, patch: &ProjectPatch) -> Result<(), ValidationError> {
        let name = patch
            .name
            .as_deref()
            .map(|value| normalize_name(EntityKind::Project, value))
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

#[cfg(test)]
mod tests {
    use super::{Project, ProjectPatch};
    use uuid::Uuid;

    #[test]
    fn empty_notes_patch_clears_notes() {
        let mut project = Project::new("Garden", Uuid::new_v4(), Some("seeds".into())).unwrap();
        project
            .apply(&ProjectPatch {
                name: None,
                notes: Some(String::new()),
            })
            .unwrap();
        assert_eq!(project.notes, None);
        assert_eq!(project.name, "Garden");
    }

    #[test]
    fn new_project_rejects_blank_name() {
        assert!(Project::new("", Uuid::new_v4(), None).is_err());
    }
}
