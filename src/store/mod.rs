pub mod memory;
pub mod sqlite;

pub use memory::MemoryTaskStore;
pub use sqlite::SqliteTaskStore;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// A persisted task row. The id is assigned by the store at insert time and
/// never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial update applied by `PUT /api/tasks/{id}`. Absent fields are left
/// untouched; the id itself is never patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

/// The persistence adapter. One logical collection of tasks.
///
/// "Not found" is signalled in-band (`Option` / `bool`) rather than as an
/// error, so callers decide what a miss means; `Err` is reserved for the
/// store itself misbehaving.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks in the store's natural (insertion) order.
    async fn list_all(&self) -> Result<Vec<Task>>;

    /// Insert a task and return it with its assigned id.
    async fn insert(&self, title: &str, completed: bool) -> Result<Task>;

    /// Apply a partial update; `None` when no task has that id.
    async fn update_by_id(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>>;

    /// Delete by id; `false` when no task had that id.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool>;
}

/// Validate a caller-supplied id before it goes anywhere near the store.
/// A malformed id is a client error, not a lookup miss.
pub fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::Validation(format!("malformed task id: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_id_parses() {
        let id = Uuid::new_v4();
        assert_eq!(parse_task_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for raw in ["", "42", "not-a-uuid", "deadbeef"] {
            assert!(matches!(
                parse_task_id(raw),
                Err(ApiError::Validation(_))
            ));
        }
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch {
            completed: Some(true),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
