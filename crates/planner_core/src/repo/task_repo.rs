//! Task persistence contract and SQLite implementation.

use crate::model::meta::{EntityKind, EntityMeta, ProjectId, TaskId};
use crate::model::task::{Task, TaskPatch};
use crate::repo::{parse_uuid, row_exists, RepoError, RepoResult, SqlitePlannerRepository};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    name,
    project_id,
    notes,
    created_at,
    updated_at
FROM tasks";

/// Repository interface for Task records.
pub trait TaskRepository {
    /// Inserts a task; fails with `NotFound` when its project is absent.
    fn insert_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists tasks, restricted to one project when `project_id` is set.
    fn list_tasks(&self, project_id: Option<ProjectId>) -> RepoResult<Vec<Task>>;
    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> RepoResult<Task>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

impl TaskRepository for SqlitePlannerRepository<'_> {
    fn insert_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let tx = self.write_tx()?;
        if !row_exists(&tx, "projects", task.project_id)? {
            return Err(RepoError::NotFound {
                kind: EntityKind::Project,
                id: task.project_id,
            });
        }

        tx.execute(
            "INSERT INTO tasks (
                id,
                name,
                project_id,
                notes,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                task.meta.id.to_string(),
                task.name.as_str(),
                task.project_id.to_string(),
                task.notes.as_deref(),
                task.meta.created_at,
                task.meta.updated_at,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        load_task(self.conn, id)
    }

    fn list_tasks(&self, project_id: Option<ProjectId>) -> RepoResult<Vec<Task>> {
        let mut tasks = Vec::new();
        match project_id {
            Some(project_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{TASK_SELECT_SQL}
                     WHERE project_id = ?1
                     ORDER BY rowid ASC;"
                ))?;
                let mut rows = stmt.query([project_id.to_string()])?;
                while let Some(row) = rows.next()? {
                    tasks.push(parse_task_row(row)?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "{TASK_SELECT_SQL} ORDER BY rowid ASC;"
                ))?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    tasks.push(parse_task_row(row)?);
                }
            }
        }
        Ok(tasks)
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> RepoResult<Task> {
        let tx = self.write_tx()?;
        let mut task = load_task(&tx, id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Task,
            id,
        })?;
        task.apply(patch)?;

        tx.execute(
            "UPDATE tasks
             SET
                name = ?2,
                notes = ?3,
                updated_at = ?4
             WHERE id = ?1;",
            params![
                id.to_string(),
                task.name.as_str(),
                task.notes.as_deref(),
                task.meta.updated_at,
            ],
        )?;
        tx.commit()?;
        Ok(task)
    }

    // Tasks are leaves; no dependents gate applies.
    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Task,
                id,
            });
        }
        Ok(())
    }
}

fn load_task(conn: &Connection, id: TaskId) -> RepoResult<Option<Task>> {
    conn.query_row(
        &format!("{TASK_SELECT_SQL} WHERE id = ?1;"),
        [id.to_string()],
        |row| Ok(parse_task_row(row)),
    )
    .optional()?
    .transpose()
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let project_id_text: String = row.get("project_id")?;
    let task = Task {
        meta: EntityMeta {
            id: parse_uuid(&id_text, "tasks.id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        },
        name: row.get("name")?,
        project_id: parse_uuid(&project_id_text, "tasks.project_id")?,
        notes: row.get("notes")?,
    };
    task.validate().map_err(|err| {
        RepoError::InvalidData(format!("task {id_text} failed validation: {err}"))
    })?;
    Ok(task)
}
