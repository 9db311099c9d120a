//! Area persistence contract and SQLite implementation.

use crate::model::area::{Area, AreaPatch};
use crate::model::meta::{AreaId, EntityKind, EntityMeta};
use crate::repo::integrity::{ensure_deletable, ParentRef};
use crate::repo::{parse_uuid, row_exists, RepoError, RepoResult, SqlitePlannerRepository};
use rusqlite::{params, Connection, OptionalExtension, Row};

const AREA_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    created_at,
    updated_at
FROM areas";

/// Repository interface for Area records.
pub trait AreaRepository {
    fn insert_area(&self, area: &Area) -> RepoResult<()>;
    fn get_area(&self, id: AreaId) -> RepoResult<Option<Area>>;
    fn list_areas(&self) -> RepoResult<Vec<Area>>;
    /// Applies `patch` to the stored area and returns the new snapshot.
    fn update_area(&self, id: AreaId, patch: &AreaPatch) -> RepoResult<Area>;
    /// Deletes an area that has no projects.
    fn delete_area(&self, id: AreaId) -> RepoResult<()>;
}

impl AreaRepository for SqlitePlannerRepository<'_> {
    fn insert_area(&self, area: &Area) -> RepoResult<()> {
        area.validate()?;

        self.conn.execute(
            "INSERT INTO areas (
                id,
                name,
                description,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                area.meta.id.to_string(),
                area.name.as_str(),
                area.description.as_deref(),
                area.meta.created_at,
                area.meta.updated_at,
            ],
        )?;
        Ok(())
    }

    fn get_area(&self, id: AreaId) -> RepoResult<Option<Area>> {
        load_area(self.conn, id)
    }

    fn list_areas(&self) -> RepoResult<Vec<Area>> {
        let mut stmt = self.conn.prepare(&format!(
            "{AREA_SELECT_SQL} ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut areas = Vec::new();
        while let Some(row) = rows.next()? {
            areas.push(parse_area_row(row)?);
        }
        Ok(areas)
    }

    fn update_area(&self, id: AreaId, patch: &AreaPatch) -> RepoResult<Area> {
        let tx = self.write_tx()?;
        let mut area = load_area(&tx, id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Area,
            id,
        })?;
        area.apply(patch)?;

        tx.execute(
            "UPDATE areas
             SET
                name = ?2,
                description = ?3,
                updated_at = ?4
             WHERE id = ?1;",
            params![
                id.to_string(),
                area.name.as_str(),
                area.description.as_deref(),
                area.meta.updated_at,
            ],
        )?;
        tx.commit()?;
        Ok(area)
    }

    fn delete_area(&self, id: AreaId) -> RepoResult<()> {
        let tx = self.write_tx()?;
        if !row_exists(&tx, "areas", id)? {
            return Err(RepoError::NotFound {
                kind: EntityKind::Area,
                id,
            });
        }
        ensure_deletable(&tx, ParentRef::Area(id))?;

        tx.execute("DELETE FROM areas WHERE id = ?1;", [id.to_string()])?;
        tx.commit()?;
        Ok(())
    }
}

fn load_area(conn: &Connection, id: AreaId) -> RepoResult<Option<Area>> {
    conn.query_row(
        &format!("{AREA_SELECT_SQL} WHERE id = ?1;"),
        [id.to_string()],
        |row| Ok(parse_area_row(row)),
    )
    .optional()?
    .transpose()
}

fn parse_area_row(row: &Row<'_>) -> RepoResult<Area> {
    let id_text: String = row.get("id")?;
    let area = Area {
        meta: EntityMeta {
            id: parse_uuid(&id_text, "areas.id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        },
        name: row.get("name")?,
        description: row.get("description")?,
    };
    area.validate().map_err(|err| {
        RepoError::InvalidData(format!("area {id_text} failed validation: {err}"))
    })?;
    Ok(area)
}
