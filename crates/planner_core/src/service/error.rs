//! Store-level error taxonomy returned to callers.

use crate::db::DbError;
use crate::model::meta::{EntityId, EntityKind};
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by every store operation.
///
/// Store state is unchanged whenever one of these is returned.
#[derive(Debug)]
pub enum StoreError {
    /// Caller data violates a field constraint.
    Validation(ValidationError),
    /// The entity, or the parent named on create, does not exist.
    NotFound { kind: EntityKind, id: EntityId },
    /// Delete blocked because children still reference the entity.
    Integrity {
        kind: EntityKind,
        id: EntityId,
        dependents: u64,
    },
    /// The storage medium failed.
    Persistence(RepoError),
}

/// Stable machine-readable category of a `StoreError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    Validation,
    NotFound,
    Integrity,
    Persistence,
}

impl StoreErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Integrity => "integrity",
            Self::Persistence => "persistence",
        }
    }
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::Validation(_) => StoreErrorKind::Validation,
            Self::NotFound { .. } => StoreErrorKind::NotFound,
            Self::Integrity { .. } => StoreErrorKind::Integrity,
            Self::Persistence(_) => StoreErrorKind::Persistence,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Integrity {
                kind,
                id,
                dependents,
            } => {
                let child = match kind {
                    EntityKind::Area => "project",
                    _ => "task",
                };
                write!(
                    f,
                    "cannot delete {kind} {id}: it still has {dependents} {child}(s)"
                )
            }
            Self::Persistence(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepoError::HasDependents {
                kind,
                id,
                dependents,
            } => Self::Integrity {
                kind,
                id,
                dependents,
            },
            other => Self::Persistence(other),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Persistence(RepoError::Db(value))
    }
}
