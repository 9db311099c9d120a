//! Use-case API for UI-facing calls.
//!
//! # Responsibility
//! - Expose the planner operations (`create_area`, `list_projects`, ...) as
//!   plain functions over one process-wide store.
//! - Translate core snapshots into UI-ready items and core errors into a
//!   stable `{ code, message }` shape.
//!
//! # Invariants
//! - Exported functions must not panic.
//! - Ids cross this boundary in the lowercase hyphenated form the store
//!   issues; any other spelling is reported exactly like an id that does not
//!   exist.
//! - An empty list filter means "no filter"; a malformed one matches nothing
//!   and is never an error.

use log::{info, warn};
use once_cell::sync::OnceCell;
use planner_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Area, AreaPatch, EntityId, EntityKind, LogLevel, PlannerConfig, PlannerStore, Project,
    ProjectPatch, StoreError, StoreErrorKind, StoreLocation, Task, TaskPatch,
};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use uuid::Uuid;

static STORE: OnceCell<PlannerStore> = OnceCell::new();

pub type ApiResult<T> = Result<T, ApiError>;

/// Stable machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    Validation,
    NotFound,
    Integrity,
    Persistence,
    /// Environment configuration could not be resolved.
    Config,
    /// `init_store` was called again with a different location.
    AlreadyInitialized,
}

impl ApiErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Integrity => "integrity",
            Self::Persistence => "persistence",
            Self::Config => "config",
            Self::AlreadyInitialized => "already_initialized",
        }
    }
}

/// Error envelope returned by every fallible call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    /// Human-readable reason, safe to show in the UI.
    pub message: String,
}

impl ApiError {
    fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let code = match err.kind() {
            StoreErrorKind::Validation => ApiErrorCode::Validation,
            StoreErrorKind::NotFound => ApiErrorCode::NotFound,
            StoreErrorKind::Integrity => ApiErrorCode::Integrity,
            StoreErrorKind::Persistence => ApiErrorCode::Persistence,
        };
        Self::new(code, err.to_string())
    }
}

/// Area as shown by the UI. Absent description is an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectItem {
    pub id: String,
    pub name: String,
    pub area_id: String,
    pub notes: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskItem {
    pub id: String,
    pub name: String,
    pub project_id: String,
    pub notes: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Area> for AreaItem {
    fn from(area: Area) -> Self {
        Self {
            id: area.meta.id.to_string(),
            name: area.name,
            description: area.description.unwrap_or_default(),
            created_at: area.meta.created_at,
            updated_at: area.meta.updated_at,
        }
    }
}

impl From<Project> for ProjectItem {
    fn from(project: Project) -> Self {
        Self {
            id: project.meta.id.to_string(),
            name: project.name,
            area_id: project.area_id.to_string(),
            notes: project.notes.unwrap_or_default(),
            created_at: project.meta.created_at,
            updated_at: project.meta.updated_at,
        }
    }
}

impl From<Task> for TaskItem {
    fn from(task: Task) -> Self {
        Self {
            id: task.meta.id.to_string(),
            name: task.name,
            project_id: task.project_id.to_string(),
            notes: task.notes.unwrap_or_default(),
            created_at: task.meta.created_at,
            updated_at: task.meta.updated_at,
        }
    }
}

/// Minimal health-check API for smoke integration.
pub fn ping() -> String {
    ping_inner().to_owned()
}

pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// Returns an empty string on success and the error message on failure.
/// Repeating the call with the same `level + log_dir` is a no-op.
pub fn init_logging(level: String, log_dir: String) -> String {
    let result = level
        .parse::<LogLevel>()
        .and_then(|level| init_logging_inner(level, log_dir.trim()));
    match result {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Opens the process-wide store.
///
/// - Empty `db_path`: location resolved from `PLANNER_*` environment
///   variables and platform defaults.
/// - Otherwise: the given database file, with backups kept beside it.
///
/// Idempotent for the same location; any other location after the store is
/// open fails with `already_initialized`. Operations called before this
/// open the environment-resolved store lazily.
pub fn init_store(db_path: String) -> ApiResult<()> {
    let config = resolve_config(db_path.trim())?;
    let store = STORE.get_or_try_init(|| open_store(&config))?;
    match store.location() {
        StoreLocation::File(path) if path == &config.db_path => Ok(()),
        StoreLocation::File(path) => Err(ApiError::new(
            ApiErrorCode::AlreadyInitialized,
            format!("store already open at `{}`", path.display()),
        )),
        StoreLocation::Memory => Err(ApiError::new(
            ApiErrorCode::AlreadyInitialized,
            "store already open in memory",
        )),
    }
}

pub fn create_area(name: String, description: String) -> ApiResult<AreaItem> {
    let area = store()?.create_area(&name, Some(description))?;
    Ok(area.into())
}

pub fn get_area(id: String) -> ApiResult<AreaItem> {
    let id = parse_id(EntityKind::Area, &id)?;
    Ok(store()?.get_area(id)?.into())
}

pub fn list_areas() -> ApiResult<Vec<AreaItem>> {
    let areas = store()?.list_areas()?;
    Ok(areas.into_iter().map(AreaItem::from).collect())
}

/// Partially updates an area. `None` leaves a field as is; an empty
/// `description` clears it.
pub fn update_area(
    id: String,
    name: Option<String>,
    description: Option<String>,
) -> ApiResult<AreaItem> {
    let id = parse_id(EntityKind::Area, &id)?;
    let patch = AreaPatch { name, description };
    Ok(store()?.update_area(id, &patch)?.into())
}

pub fn delete_area(id: String) -> ApiResult<()> {
    let id = parse_id(EntityKind::Area, &id)?;
    Ok(store()?.delete_area(id)?)
}

pub fn create_project(name: String, area_id: String, notes: String) -> ApiResult<ProjectItem> {
    let area_id = parse_id(EntityKind::Area, &area_id)?;
    let project = store()?.create_project(&name, area_id, Some(notes))?;
    Ok(project.into())
}

pub fn get_project(id: String) -> ApiResult<ProjectItem> {
    let id = parse_id(EntityKind::Project, &id)?;
    Ok(store()?.get_project(id)?.into())
}

/// Lists projects, optionally only those of one area.
pub fn list_projects(area_id: Option<String>) -> ApiResult<Vec<ProjectItem>> {
    let filter = match parse_filter(area_id.as_deref()) {
        Filter::All => None,
        Filter::Only(id) => Some(id),
        Filter::Unmatchable => return Ok(Vec::new()),
    };
    let projects = store()?.list_projects(filter)?;
    Ok(projects.into_iter().map(ProjectItem::from).collect())
}

pub fn update_project(
    id: String,
    name: Option<String>,
    notes: Option<String>,
) -> ApiResult<ProjectItem> {
    let id = parse_id(EntityKind::Project, &id)?;
    let patch = ProjectPatch { name, notes };
    Ok(store()?.update_project(id, &patch)?.into())
}

pub fn delete_project(id: String) -> ApiResult<()> {
    let id = parse_id(EntityKind::Project, &id)?;
    Ok(store()?.delete_project(id)?)
}

pub fn create_task(name: String, project_id: String, notes: String) -> ApiResult<TaskItem> {
    let project_id = parse_id(EntityKind::Project, &project_id)?;
    let task = store()?.create_task(&name, project_id, Some(notes))?;
    Ok(task.into())
}

pub fn get_task(id: String) -> ApiResult<TaskItem> {
    let id = parse_id(EntityKind::Task, &id)?;
    Ok(store()?.get_task(id)?.into())
}

/// Lists tasks, optionally only those of one project.
pub fn list_tasks(project_id: Option<String>) -> ApiResult<Vec<TaskItem>> {
    let filter = match parse_filter(project_id.as_deref()) {
        Filter::All => None,
        Filter::Only(id) => Some(id),
        Filter::Unmatchable => return Ok(Vec::new()),
    };
    let tasks = store()?.list_tasks(filter)?;
    Ok(tasks.into_iter().map(TaskItem::from).collect())
}

pub fn update_task(id: String, name: Option<String>, notes: Option<String>) -> ApiResult<TaskItem> {
    let id = parse_id(EntityKind::Task, &id)?;
    let patch = TaskPatch { name, notes };
    Ok(store()?.update_task(id, &patch)?.into())
}

pub fn delete_task(id: String) -> ApiResult<()> {
    let id = parse_id(EntityKind::Task, &id)?;
    Ok(store()?.delete_task(id)?)
}

fn store() -> ApiResult<&'static PlannerStore> {
    STORE.get_or_try_init(|| {
        let config = resolve_config("")?;
        open_store(&config)
    })
}

fn resolve_config(db_path: &str) -> ApiResult<PlannerConfig> {
    if db_path.is_empty() {
        return PlannerConfig::from_env()
            .map_err(|err| ApiError::new(ApiErrorCode::Config, err.to_string()));
    }
    let db_path = PathBuf::from(db_path);
    let data_dir = db_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(PlannerConfig {
        db_path,
        ..PlannerConfig::for_data_dir(data_dir)
    })
}

fn open_store(config: &PlannerConfig) -> ApiResult<PlannerStore> {
    match PlannerStore::open(config) {
        Ok(store) => {
            info!("event=store_init module=api status=ok");
            Ok(store)
        }
        Err(err) => {
            warn!(
                "event=store_init module=api status=error error_code={}",
                err.kind().as_str()
            );
            Err(err.into())
        }
    }
}

fn parse_id(kind: EntityKind, raw: &str) -> ApiResult<EntityId> {
    parse_canonical(raw.trim())
        .ok_or_else(|| ApiError::new(ApiErrorCode::NotFound, format!("{kind} not found: {raw}")))
}

// Uppercase, simple, braced and URN spellings parse too; only the issued
// form names a record.
fn parse_canonical(value: &str) -> Option<EntityId> {
    Uuid::try_parse(value)
        .ok()
        .filter(|id| id.hyphenated().to_string() == value)
}

enum Filter {
    All,
    Only(EntityId),
    /// Syntactically invalid id; nothing can match it.
    Unmatchable,
}

fn parse_filter(raw: Option<&str>) -> Filter {
    match raw.map(str::trim) {
        None | Some("") => Filter::All,
        Some(value) => parse_canonical(value).map_or(Filter::Unmatchable, Filter::Only),
    }
}
