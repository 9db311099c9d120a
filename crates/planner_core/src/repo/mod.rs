//! Repository layer: persistence contracts and their SQLite implementation.
//!
//! # Responsibility
//! - Define per-kind data access contracts (`AreaRepository`,
//!   `ProjectRepository`, `TaskRepository`).
//! - Keep SQL, transactions and row decoding inside this boundary.
//!
//! # Invariants
//! - Every mutation runs in one `IMMEDIATE` transaction, so existence,
//!   parent and dependents checks see the same state the write commits on.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Listing order is insertion order (`rowid`), independent of the wall clock.

pub mod area_repo;
pub mod integrity;
pub mod project_repo;
pub mod task_repo;

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::meta::{EntityId, EntityKind};
use crate::model::validation::ValidationError;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// No record of `kind` with `id` exists.
    NotFound { kind: EntityKind, id: EntityId },
    /// Delete refused because `dependents` child records reference `id`.
    HasDependents {
        kind: EntityKind,
        id: EntityId,
        dependents: u64,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::HasDependents {
                kind,
                id,
                dependents,
            } => write!(
                f,
                "{kind} {id} has {dependents} dependent {}(s); remove them first",
                dependent_kind_label(*kind)
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "planner repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "planner repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "planner repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    (
        "areas",
        &["id", "name", "description", "created_at", "updated_at"],
    ),
    (
        "projects",
        &["id", "name", "area_id", "notes", "created_at", "updated_at"],
    ),
    (
        "tasks",
        &["id", "name", "project_id", "notes", "created_at", "updated_at"],
    ),
];

/// SQLite-backed repository for all three entity kinds.
///
/// Implements `AreaRepository`, `ProjectRepository` and `TaskRepository`
/// over one borrowed connection.
pub struct SqlitePlannerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlannerRepository<'conn> {
    /// Creates a repository after verifying the connection is fully migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Skips schema checks for a connection already verified by `try_new`.
    pub(crate) fn assume_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn write_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

fn dependent_kind_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Area => "project",
        EntityKind::Project => "task",
        EntityKind::Task => "child",
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

/// Whether a row with `id` exists in `table`. `table` is always a literal.
pub(crate) fn row_exists(conn: &Connection, table: &'static str, id: EntityId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        let present = table_columns(conn, table)?;
        let missing = columns
            .iter()
            .find(|column| !present.iter().any(|name| name == *column));
        if let Some(&column) = missing {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get(1)?);
    }
    Ok(columns)
}
