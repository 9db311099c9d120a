//! Referential-integrity predicates evaluated against live store state.
//!
//! # Invariants
//! - Predicates read through whatever connection or transaction they are
//!   given; delete paths pass their own write transaction.
//! - Nothing here mutates data.

use crate::model::meta::{AreaId, EntityId, EntityKind, ProjectId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// Parent side of a foreign-key relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    /// Parent of projects via `projects.area_id`.
    Area(AreaId),
    /// Parent of tasks via `tasks.project_id`.
    Project(ProjectId),
}

impl ParentRef {
    pub fn kind(self) -> EntityKind {
        match self {
            Self::Area(_) => EntityKind::Area,
            Self::Project(_) => EntityKind::Project,
        }
    }

    pub fn id(self) -> EntityId {
        match self {
            Self::Area(id) | Self::Project(id) => id,
        }
    }

    fn dependents_sql(self) -> &'static str {
        match self {
            Self::Area(_) => "SELECT COUNT(*) FROM projects WHERE area_id = ?1;",
            Self::Project(_) => "SELECT COUNT(*) FROM tasks WHERE project_id = ?1;",
        }
    }
}

/// Counts child records currently referencing `parent`.
pub fn count_dependents(conn: &Connection, parent: ParentRef) -> RepoResult<u64> {
    let count: i64 = conn.query_row(parent.dependents_sql(), [parent.id().to_string()], |row| {
        row.get(0)
    })?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative dependents count {count}")))
}

/// Whether at least one child record references `parent`.
pub fn has_dependents(conn: &Connection, parent: ParentRef) -> RepoResult<bool> {
    Ok(count_dependents(conn, parent)? > 0)
}

/// Fails with `RepoError::HasDependents` when `parent` still has children.
pub fn ensure_deletable(conn: &Connection, parent: ParentRef) -> RepoResult<()> {
    match count_dependents(conn, parent)? {
        0 => Ok(()),
        dependents => Err(RepoError::HasDependents {
            kind: parent.kind(),
            id: parent.id(),
            dependents,
        }),
    }
}
