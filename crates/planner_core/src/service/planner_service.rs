//! Planner use-case service.
//!
//! # Responsibility
//! - Create, read, update and delete Areas, Projects and Tasks.
//! - Issue ids and timestamps; callers never supply them.
//!
//! # Invariants
//! - Blank names are rejected before any repository call.
//! - An unknown parent on create is `NotFound`; an unknown parent used as a
//!   list filter yields an empty list.
//! - Foreign keys are fixed at creation; patches cannot carry them.

use crate::model::area::{Area, AreaPatch};
use crate::model::meta::{AreaId, EntityKind, ProjectId, TaskId};
use crate::model::project::{Project, ProjectPatch};
use crate::model::task::{Task, TaskPatch};
use crate::repo::area_repo::AreaRepository;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::error::{StoreError, StoreResult};

/// Use-case service for the Area → Project → Task hierarchy.
pub struct PlannerService<R> {
    repo: R,
}

impl<R> PlannerService<R>
where
    R: AreaRepository + ProjectRepository + TaskRepository,
{
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an Area. An empty `description` is stored as absent.
    pub fn create_area(&self, name: &str, description: Option<String>) -> StoreResult<Area> {
        let area = Area::new(name, description)?;
        self.repo.insert_area(&area)?;
        Ok(area)
    }

    pub fn get_area(&self, id: AreaId) -> StoreResult<Area> {
        self.repo.get_area(id)?.ok_or(StoreError::NotFound {
            kind: EntityKind::Area,
            id,
        })
    }

    /// Lists all areas in creation order.
    pub fn list_areas(&self) -> StoreResult<Vec<Area>> {
        Ok(self.repo.list_areas()?)
    }

    /// Applies a partial update and returns the new snapshot.
    pub fn update_area(&self, id: AreaId, patch: &AreaPatch) -> StoreResult<Area> {
        Ok(self.repo.update_area(id, patch)?)
    }

    /// Deletes an area.
    ///
    /// # Errors
    /// - `NotFound` when the area does not exist.
    /// - `Integrity` when at least one project still belongs to it.
    pub fn delete_area(&self, id: AreaId) -> StoreResult<()> {
        Ok(self.repo.delete_area(id)?)
    }

    /// Creates a Project under an existing Area.
    pub fn create_project(
        &self,
        name: &str,
        area_id: AreaId,
        notes: Option<String>,
    ) -> StoreResult<Project> {
        let project = Project::new(name, area_id, notes)?;
        self.repo.insert_project(&project)?;
        Ok(project)
    }

    pub fn get_project(&self, id: ProjectId) -> StoreResult<Project> {
        self.repo.get_project(id)?.ok_or(StoreError::NotFound {
            kind: EntityKind::Project,
            id,
        })
    }

    /// Lists projects in creation order, optionally restricted to one area.
    pub fn list_projects(&self, area_id: Option<AreaId>) -> StoreResult<Vec<Project>> {
        Ok(self.repo.list_projects(area_id)?)
    }

    pub fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> StoreResult<Project> {
        Ok(self.repo.update_project(id, patch)?)
    }

    /// Deletes a project; `Integrity` when tasks still belong to it.
    pub fn delete_project(&self, id: ProjectId) -> StoreResult<()> {
        Ok(self.repo.delete_project(id)?)
    }

    /// Creates a Task under an existing Project.
    pub fn create_task(
        &self,
        name: &str,
        project_id: ProjectId,
        notes: Option<String>,
    ) -> StoreResult<Task> {
        let task = Task::new(name, project_id, notes)?;
        self.repo.insert_task(&task)?;
        Ok(task)
    }

    pub fn get_task(&self, id: TaskId) -> StoreResult<Task> {
        self.repo.get_task(id)?.ok_or(StoreError::NotFound {
            kind: EntityKind::Task,
            id,
        })
    }

    pub fn list_tasks(&self, project_id: Option<ProjectId>) -> StoreResult<Vec<Task>> {
        Ok(self.repo.list_tasks(project_id)?)
    }

    pub fn update_task(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<Task> {
        Ok(self.repo.update_task(id, patch)?)
    }

    pub fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        Ok(self.repo.delete_task(id)?)
    }
}
