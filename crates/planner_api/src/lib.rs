//! UI-facing operation surface over the planner core.

pub mod api;

pub use api::*;
