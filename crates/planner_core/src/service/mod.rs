//! Use-case services over the repository layer.
//!
//! # Responsibility
//! - Turn caller input into validated entities and partial updates.
//! - Translate repository failures into the store error taxonomy.
//!
//! # Invariants
//! - Services never bypass repository transactions.
//! - Services remain storage-agnostic (generic over repository traits).

pub mod error;
pub mod planner_service;
