//! Domain model for the Area → Project → Task hierarchy.
//!
//! # Responsibility
//! - Define the three entity records and their partial-update patches.
//! - Own field validation so every write path shares one rule set.
//!
//! # Invariants
//! - Every entity embeds one `EntityMeta` (id + timestamps); there is no
//!   shared base record.
//! - `name` is never blank after trim.
//! - `id` and `created_at` never change after construction.

pub mod area;
pub mod meta;
pub mod project;
pub mod task;
pub mod validation;
