//! Field rules shared by all entity kinds.

use crate::model::meta::EntityKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-supplied data violates a field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `name` is empty or whitespace-only.
    BlankName { kind: EntityKind },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName { kind } => write!(f, "{kind} name must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Trims a name and rejects it when nothing is left.
pub fn normalize_name(kind: EntityKind, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankName { kind });
    }
    Ok(trimmed.to_string())
}

/// Maps optional free text to its stored form.
///
/// An empty string means "no value" and is stored as `None`. Other text is
/// kept verbatim.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, normalize_optional_text, ValidationError};
    use crate::model::meta::EntityKind;

    #[test]
    fn normalize_name_trims_surrounding_whitespace() {
        assert_eq!(
            normalize_name(EntityKind::Area, "  Work \n").unwrap(),
            "Work"
        );
    }

    #[test]
    fn normalize_name_rejects_whitespace_only() {
        let err = normalize_name(EntityKind::Task, " \t ").unwrap_err();
        assert_eq!(
            err,
            ValidationError::BlankName {
                kind: EntityKind::Task
            }
        );
        assert_eq!(err.to_string(), "task name must not be blank");
    }

    #[test]
    fn empty_optional_text_clears_value() {
        assert_eq!(normalize_optional_text(Some(String::new())), None);
        assert_eq!(
            normalize_optional_text(Some("  keep ".to_string())).as_deref(),
            Some("  keep ")
        );
        assert_eq!(normalize_optional_text(None), None);
    }
}
