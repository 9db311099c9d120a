//! Thread-safe entry point owning the planner database.
//!
//! # Responsibility
//! - Bootstrap the database (backup, open, migrate, schema check).
//! - Serialize every operation through one connection lock.
//!
//! # Invariants
//! - Only one operation touches the connection at a time, so a delete's
//!   dependents check can never interleave with a concurrent child create.
//! - Callers only ever receive owned snapshots.

use crate::config::PlannerConfig;
use crate::db::{backup_database, open_db, open_db_in_memory, BackupOutcome};
use crate::model::area::{Area, AreaPatch};
use crate::model::meta::{AreaId, ProjectId, TaskId};
use crate::model::project::{Project, ProjectPatch};
use crate::model::task::{Task, TaskPatch};
use crate::repo::SqlitePlannerRepository;
use crate::service::error::{StoreError, StoreErrorKind, StoreResult};
use crate::service::planner_service::PlannerService;
use log::{debug, error, info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

/// Owner of the planner database and the single-writer lock around it.
pub struct PlannerStore {
    conn: Mutex<Connection>,
    location: StoreLocation,
}

type SqliteService<'conn> = PlannerService<SqlitePlannerRepository<'conn>>;

impl PlannerStore {
    /// Backs up the configured database file, then opens it.
    ///
    /// A failed backup is logged and does not prevent opening.
    pub fn open(config: &PlannerConfig) -> StoreResult<Self> {
        match backup_database(&config.db_path, config.max_backups) {
            Ok(BackupOutcome::Created { pruned, .. }) => {
                info!("event=store_backup module=store status=ok pruned={pruned}");
            }
            Ok(BackupOutcome::NothingToBackUp) => {
                debug!("event=store_backup module=store status=skipped reason=no_database");
            }
            Err(err) => {
                warn!("event=store_backup module=store status=error error={err}");
            }
        }
        Self::open_path(&config.db_path)
    }

    /// Opens (creating if needed) the database file at `path`.
    pub fn open_path(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = open_db(path)?;
        Self::from_connection(conn, StoreLocation::File(path.to_path_buf()))
    }

    /// Opens a private in-memory store; data is lost when it is dropped.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_db_in_memory()?;
        Self::from_connection(conn, StoreLocation::Memory)
    }

    fn from_connection(conn: Connection, location: StoreLocation) -> StoreResult<Self> {
        SqlitePlannerRepository::try_new(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn create_area(&self, name: &str, description: Option<String>) -> StoreResult<Area> {
        self.run("create_area", |service| {
            service.create_area(name, description)
        })
    }

    pub fn get_area(&self, id: AreaId) -> StoreResult<Area> {
        self.run("get_area", |service| service.get_area(id))
    }

    pub fn list_areas(&self) -> StoreResult<Vec<Area>> {
        self.run("list_areas", |service| service.list_areas())
    }

    pub fn update_area(&self, id: AreaId, patch: &AreaPatch) -> StoreResult<Area> {
        self.run("update_area", |service| service.update_area(id, patch))
    }

    pub fn delete_area(&self, id: AreaId) -> StoreResult<()> {
        self.run("delete_area", |service| service.delete_area(id))
    }

    pub fn create_project(
        &self,
        name: &str,
        area_id: AreaId,
        notes: Option<String>,
    ) -> StoreResult<Project> {
        self.run("create_project", |service| {
            service.create_project(name, area_id, notes)
        })
    }

    pub fn get_project(&self, id: ProjectId) -> StoreResult<Project> {
        self.run("get_project", |service| service.get_project(id))
    }

    pub fn list_projects(&self, area_id: Option<AreaId>) -> StoreResult<Vec<Project>> {
        self.run("list_projects", |service| service.list_projects(area_id))
    }

    pub fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> StoreResult<Project> {
        self.run("update_project", |service| service.update_project(id, patch))
    }

    pub fn delete_project(&self, id: ProjectId) -> StoreResult<()> {
        self.run("delete_project", |service| service.delete_project(id))
    }

    pub fn create_task(
        &self,
        name: &str,
        project_id: ProjectId,
        notes: Option<String>,
    ) -> StoreResult<Task> {
        self.run("create_task", |service| {
            service.create_task(name, project_id, notes)
        })
    }

    pub fn get_task(&self, id: TaskId) -> StoreResult<Task> {
        self.run("get_task", |service| service.get_task(id))
    }

    pub fn list_tasks(&self, project_id: Option<ProjectId>) -> StoreResult<Vec<Task>> {
        self.run("list_tasks", |service| service.list_tasks(project_id))
    }

    pub fn update_task(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<Task> {
        self.run("update_task", |service| service.update_task(id, patch))
    }

    pub fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.run("delete_task", |service| service.delete_task(id))
    }

    fn run<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&SqliteService<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        // A panic mid-operation drops its transaction, which rolls back, so
        // the connection behind a poisoned lock is still consistent.
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let service = PlannerService::new(SqlitePlannerRepository::assume_ready(&conn));
        let result = f(&service);

        let duration_ms = started_at.elapsed().as_millis();
        match &result {
            Ok(_) => debug!("event=store_op module=store op={op} status=ok duration_ms={duration_ms}"),
            Err(err) if is_logged_failure(err) => error!(
                "event=store_op module=store op={op} status=error duration_ms={duration_ms} error_code=persistence error={err}"
            ),
            // Validation, not-found and integrity outcomes belong to the caller.
            Err(_) => {}
        }
        result
    }
}

fn is_logged_failure(err: &StoreError) -> bool {
    err.kind() == StoreErrorKind::Persistence
}

#[cfg(test)]
mod tests {
    use super::{is_logged_failure, PlannerStore};
    use crate::model::area::AreaPatch;
    use crate::repo::RepoError;
    use crate::service::error::StoreError;
    use uuid::Uuid;

    #[test]
    fn only_persistence_failures_are_logged() {
        let store = PlannerStore::open_in_memory().unwrap();
        let area = store.create_area("Work", None).unwrap();
        store.create_project("Launch", area.id(), None).unwrap();

        let blank = store
            .update_area(
                area.id(),
                &AreaPatch {
                    name: Some(" ".to_string()),
                    description: None,
                },
            )
            .unwrap_err();
        let missing = store.get_task(Uuid::new_v4()).unwrap_err();
        let blocked = store.delete_area(area.id()).unwrap_err();

        assert!(!is_logged_failure(&blank));
        assert!(!is_logged_failure(&missing));
        assert!(!is_logged_failure(&blocked));
        assert!(is_logged_failure(&StoreError::Persistence(
            RepoError::InvalidData("corrupt row".to_string())
        )));
    }
}
