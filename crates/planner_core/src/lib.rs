//! Core of the planner: the Area → Project → Task entity store.
//! This crate is the single source of truth for hierarchy invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, PlannerConfig};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::area::{Area, AreaPatch};
pub use model::meta::{AreaId, EntityId, EntityKind, EntityMeta, ProjectId, TaskId};
pub use model::project::{Project, ProjectPatch};
pub use model::task::{Task, TaskPatch};
pub use model::validation::ValidationError;
pub use repo::area_repo::AreaRepository;
pub use repo::integrity::{count_dependents, has_dependents, ParentRef};
pub use repo::project_repo::ProjectRepository;
pub use repo::task_repo::TaskRepository;
pub use repo::{RepoError, RepoResult, SqlitePlannerRepository};
pub use service::error::{StoreError, StoreErrorKind, StoreResult};
pub use service::planner_service::PlannerService;
pub use store::{PlannerStore, StoreLocation};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
