//! Identity and timestamp metadata shared by all entity kinds.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier issued by the store for every entity.
pub type EntityId = Uuid;
/// Identifier of an `Area`.
pub type AreaId = EntityId;
/// Identifier of a `Project`.
pub type ProjectId = EntityId;
/// Identifier of a `Task`.
pub type TaskId = EntityId;

/// Entity kind tag used in errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Area,
    Project,
    Task,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Project => "project",
            Self::Task => "task",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-assigned metadata embedded in every entity.
///
/// Timestamps are Unix epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    pub id: EntityId,
    pub created_at: i64,
    pub updated_at: i64,
}

impl EntityMeta {
    /// Issues a fresh id with `created_at == updated_at == now`.
    pub fn issue() -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Advances `updated_at` for a successful mutation.
    ///
    /// # Invariants
    /// - The new value is strictly greater than the previous one, even when
    ///   two mutations land within the same clock millisecond.
    pub fn touch(&mut self) {
        self.updated_at = next_updated_at(self.updated_at, now_epoch_ms());
    }
}

/// Current wall clock as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn next_updated_at(previous: i64, now: i64) -> i64 {
    now.max(previous.saturating_add(1))
}
