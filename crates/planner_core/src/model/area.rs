//! Area: top-level grouping of work.
//!
//! # Invariants
//! - `name` is trimmed and non-empty.
//! - `description` is `None` rather than an empty string.

use crate::model::meta::{AreaId, EntityKind, EntityMeta};
use crate::model::validation::{normalize_name, normalize_optional_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Stored Area snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub description: Option<String>,
}

/// Partial update for an Area. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaPatch {
    pub name: Option<String>,
    /// `Some("")` clears the description.
    pub description: Option<String>,
}

impl Area {
    /// Builds a new Area with freshly issued metadata.
    pub fn new(name: &str, description: Option<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            meta: EntityMeta::issue(),
            name: normalize_name(EntityKind::Area, name)?,
            description: normalize_optional_text(description),
        })
    }

    pub fn id(&self) -> AreaId {
        self.meta.id
    }

    /// Checks field constraints of an already-built snapshot.
    pub fn validate(&self) -> Result<(), ValidationError> {
        normalize_name(EntityKind::Area, &self.name).map(|_| ())
    }

    /// Applies a patch and advances `updated_at`.
    ///
    /// Nothing is modified when the patch fails validation.
    pub fn apply(&mut self, patch: &AreaPatch) -> Result<(), ValidationError> {
        let name = patch
            .name
            .as_deref()
            .map(|value| normalize_name(EntityKind::Area, value))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = &patch.description {
            self.description = normalize_optional_text(Some(description.clone()));
        }
        self.meta.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Area, AreaPatch};

    #[test]
    fn new_area_normalizes_fields() {
        let area = Area::new("  Work ", Some(String::new())).unwrap();
        assert_eq!(area.name, "Work");
        assert_eq!(area.description, None);
        assert_eq!(area.meta.created_at, area.meta.updated_at);
    }

    #[test]
    fn apply_only_changes_supplied_fields() {
        let mut area = Area::new("Work", Some("office".to_string())).unwrap();
        let before = area.clone();

        area.apply(&AreaPatch {
            name: None,
            description: Some("remote".to_string()),
        })
        .unwrap();

        assert_eq!(area.name, before.name);
        assert_eq!(area.description.as_deref(), Some("remote"));
        assert_eq!(area.meta.id, before.meta.id);
        assert_eq!(area.meta.created_at, before.meta.created_at);
        assert!(area.meta.updated_at > before.meta.updated_at);
    }

    #[test]
    fn apply_with_blank_name_leaves_area_untouched() {
        let mut area = Area::new("Work", None).unwrap();
        let before = area.clone();

        let result = area.apply(&AreaPatch {
            name: Some("   ".to_string()),
            description: Some("ignored".to_string()),
        });

        assert!(result.is_err());
        assert_eq!(area, before);
    }

    #[test]
    fn serializes_with_flat_metadata() {
        let area = Area::new("Home", None).unwrap();
        let value = serde_json::to_value(&area).unwrap();
        assert_eq!(value["id"], area.id().to_string());
        assert_eq!(value["name"], "Home");
        assert!(value["description"].is_null());
        assert!(value.get("meta").is_none());
        assert!(value["created_at"].is_i64());
    }
}
