use planner_core::db::migrations::latest_version;
use planner_core::db::open_db_in_memory;
use planner_core::{
    Area, AreaPatch, AreaRepository, EntityKind, PlannerService, RepoError,
    SqlitePlannerRepository, StoreError, ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());

    let created = service
        .create_area("Work", Some("day job".to_string()))
        .unwrap();
    assert_eq!(created.meta.created_at, created.meta.updated_at);

    let loaded = service.get_area(created.id()).unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.description.as_deref(), Some("day job"));
}

#[test]
fn consecutive_gets_return_identical_snapshots() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());
    let area = service.create_area("Home", None).unwrap();

    let first = service.get_area(area.id()).unwrap();
    let second = service.get_area(area.id()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn mutating_a_snapshot_does_not_touch_storage() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());
    let mut area = service.create_area("Home", None).unwrap();

    area.name = "Changed locally".to_string();

    assert_eq!(service.get_area(area.id()).unwrap().name, "Home");
}

#[test]
fn whitespace_name_is_rejected_and_nothing_is_stored() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());

    let err = service
        .create_area("   ", Some("d".to_string()))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::BlankName {
            kind: EntityKind::Area
        })
    ));
    assert!(service.list_areas().unwrap().is_empty());
}

#[test]
fn names_are_stored_trimmed() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());

    let area = service.create_area("  Personal  ", None).unwrap();
    assert_eq!(service.get_area(area.id()).unwrap().name, "Personal");
}

#[test]
fn get_missing_area_is_not_found() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());
    let missing = Uuid::new_v4();

    let err = service.get_area(missing).unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound { kind: EntityKind::Area, id } if id == missing
    ));
    assert_eq!(err.to_string(), format!("area not found: {missing}"));
}

#[test]
fn list_returns_creation_order() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());

    let names = ["Work", "Home", "Health", "Finance"];
    let created: Vec<Area> = names
        .iter()
        .map(|name| service.create_area(name, None).unwrap())
        .collect();

    let listed = service.list_areas().unwrap();
    assert_eq!(listed, created);
}

#[test]
fn list_order_is_insertion_order_even_when_timestamps_tie() {
    let conn = setup();
    let repo = SqlitePlannerRepository::try_new(&conn).unwrap();

    let first = Area::new("first", None).unwrap();
    let second = Area::new("second", None).unwrap();
    repo.insert_area(&first).unwrap();
    repo.insert_area(&second).unwrap();
    conn.execute("UPDATE areas SET created_at = 1234567890000;", [])
        .unwrap();

    let ids: Vec<_> = repo.list_areas().unwrap().iter().map(Area::id).collect();
    assert_eq!(ids, vec![first.id(), second.id()]);
}

#[test]
fn list_order_survives_clock_stepping_back() {
    let conn = setup();
    let repo = SqlitePlannerRepository::try_new(&conn).unwrap();

    let first = Area::new("first", None).unwrap();
    let mut second = Area::new("second", None).unwrap();
    second.meta.created_at = first.meta.created_at - 1_000;
    second.meta.updated_at = second.meta.created_at;
    repo.insert_area(&first).unwrap();
    repo.insert_area(&second).unwrap();

    let names: Vec<_> = repo
        .list_areas()
        .unwrap()
        .into_iter()
        .map(|area| area.name)
        .collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn partial_update_changes_only_supplied_fields() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());
    let before = service
        .create_area("Work", Some("office".to_string()))
        .unwrap();

    let after = service
        .update_area(
            before.id(),
            &AreaPatch {
                name: None,
                description: Some("remote".to_string()),
            },
        )
        .unwrap();

    assert_eq!(after.name, before.name);
    assert_eq!(after.meta.id, before.meta.id);
    assert_eq!(after.meta.created_at, before.meta.created_at);
    assert!(after.meta.updated_at > before.meta.updated_at);
    assert_eq!(after.description.as_deref(), Some("remote"));
    assert_eq!(service.get_area(before.id()).unwrap(), after);
}

#[test]
fn empty_patch_still_advances_updated_at() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());
    let before = service.create_area("Work", None).unwrap();

    let after = service
        .update_area(before.id(), &AreaPatch::default())
        .unwrap();

    assert_eq!(after.name, before.name);
    assert!(after.meta.updated_at > before.meta.updated_at);
}

#[test]
fn empty_description_clears_but_absent_description_keeps() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());
    let area = service
        .create_area("Work", Some("office".to_string()))
        .unwrap();

    let renamed = service
        .update_area(
            area.id(),
            &AreaPatch {
                name: Some("Job".to_string()),
                description: None,
            },
        )
        .unwrap();
    assert_eq!(renamed.description.as_deref(), Some("office"));

    let cleared = service
        .update_area(
            area.id(),
            &AreaPatch {
                name: None,
                description: Some(String::new()),
            },
        )
        .unwrap();
    assert_eq!(cleared.name, "Job");
    assert_eq!(cleared.description, None);
}

#[test]
fn update_with_blank_name_fails_and_keeps_stored_state() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());
    let area = service.create_area("Work", None).unwrap();

    let err = service
        .update_area(
            area.id(),
            &AreaPatch {
                name: Some(" ".to_string()),
                description: Some("changed".to_string()),
            },
        )
        .unwrap_err();

    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(service.get_area(area.id()).unwrap(), area);
}

#[test]
fn update_and_delete_missing_area_are_not_found() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());
    let missing = Uuid::new_v4();

    assert!(matches!(
        service.update_area(missing, &AreaPatch::default()),
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete_area(missing),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn delete_removes_area() {
    let conn = setup();
    let service = PlannerService::new(SqlitePlannerRepository::try_new(&conn).unwrap());
    let area = service.create_area("Work", None).unwrap();

    service.delete_area(area.id()).unwrap();

    assert!(service.list_areas().unwrap().is_empty());
    assert!(matches!(
        service.get_area(area.id()),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn read_path_rejects_corrupt_rows() {
    let conn = setup();
    let repo = SqlitePlannerRepository::try_new(&conn).unwrap();
    conn.execute(
        "INSERT INTO areas (id, name, created_at, updated_at)
         VALUES ('not-a-uuid', 'Broken', 0, 0);",
        [],
    )
    .unwrap();

    let err = repo.list_areas().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("not-a-uuid")));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqlitePlannerRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqlitePlannerRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("areas"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE areas (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqlitePlannerRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "areas",
            column: "description"
        })
    ));
}
