//! Project persistence contract and SQLite implementation.
//!
//! # Invariants
//! - A project row is only inserted inside the transaction that confirmed
//!   its area exists.
//! - `area_id` is never rewritten.

use crate::model::meta::{AreaId, EntityKind, EntityMeta, ProjectId};
use crate::model::project::{Project, ProjectPatch};
use crate::repo::integrity::{ensure_deletable, ParentRef};
use crate::repo::{parse_uuid, row_exists, RepoError, RepoResult, SqlitePlannerRepository};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    area_id,
    notes,
    created_at,
    updated_at
FROM projects";

/// Repository interface for Project records.
pub trait ProjectRepository {
    /// Inserts a project; fails with `NotFound` when its area is absent.
    fn insert_project(&self, project: &Project) -> RepoResult<()>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Lists projects, restricted to one area when `area_id` is set.
    fn list_projects(&self, area_id: Option<AreaId>) -> RepoResult<Vec<Project>>;
    fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> RepoResult<Project>;
    /// Deletes a project that has no tasks.
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
}

impl ProjectRepository for SqlitePlannerRepository<'_> {
    fn insert_project(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;

        let tx = self.write_tx()?;
        if !row_exists(&tx, "areas", project.area_id)? {
            return Err(RepoError::NotFound {
                kind: EntityKind::Area,
                id: project.area_id,
            });
        }

        tx.execute(
            "INSERT INTO projects (
                id,
                name,
                area_id,
                notes,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                project.meta.id.to_string(),
                project.name.as_str(),
                project.area_id.to_string(),
                project.notes.as_deref(),
                project.meta.created_at,
                project.meta.updated_at,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        load_project(self.conn, id)
    }

    fn list_projects(&self, area_id: Option<AreaId>) -> RepoResult<Vec<Project>> {
        let mut projects = Vec::new();
        match area_id {
            Some(area_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{PROJECT_SELECT_SQL}
                     WHERE area_id = ?1
                     ORDER BY rowid ASC;"
                ))?;
                let mut rows = stmt.query([area_id.to_string()])?;
                while let Some(row) = rows.next()? {
                    projects.push(parse_project_row(row)?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "{PROJECT_SELECT_SQL} ORDER BY rowid ASC;"
                ))?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    projects.push(parse_project_row(row)?);
                }
            }
        }
        Ok(projects)
    }

    fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> RepoResult<Project> {
        let tx = self.write_tx()?;
        let mut project = load_project(&tx, id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Project,
            id,
        })?;
        project.apply(patch)?;

        tx.execute(
            "UPDATE projects
             SET
                name = ?2,
                notes = ?3,
                updated_at = ?4
             WHERE id = ?1;",
            params![
                id.to_string(),
                project.name.as_str(),
                project.notes.as_deref(),
                project.meta.updated_at,
            ],
        )?;
        tx.commit()?;
        Ok(project)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let tx = self.write_tx()?;
        if !row_exists(&tx, "projects", id)? {
            return Err(RepoError::NotFound {
                kind: EntityKind::Project,
                id,
            });
        }
        ensure_deletable(&tx, ParentRef::Project(id))?;

        tx.execute("DELETE FROM projects WHERE id = ?1;", [id.to_string()])?;
        tx.commit()?;
        Ok(())
    }
}

fn load_project(conn: &Connection, id: ProjectId) -> RepoResult<Option<Project>> {
    conn.query_row(
        &format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"),
        [id.to_string()],
        |row| Ok(parse_project_row(row)),
    )
    .optional()?
    .transpose()
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let id_text: String = row.get("id")?;
    let area_id_text: String = row.get("area_id")?;
    let project = Project {
        meta: EntityMeta {
            id: parse_uuid(&id_text, "projects.id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        },
        name: row.get("name")?,
        area_id: parse_uuid(&area_id_text, "projects.area_id")?,
        notes: row.get("notes")?,
    };
    project.validate().map_err(|err| {
        RepoError::InvalidData(format!("project {id_text} failed validation: {err}"))
    })?;
    Ok(project)
}
