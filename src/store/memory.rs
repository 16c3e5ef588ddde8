// store/memory.rs — in-memory task store for tests and ephemeral runs.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Task, TaskPatch, TaskStore};

/// Vec-backed store preserving insertion order, mirroring the SQLite store's
/// natural ordering. Substitutable for `SqliteTaskStore` anywhere an
/// `Arc<dyn TaskStore>` is expected.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_all(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn insert(&self, title: &str, completed: bool) -> Result<Task> {
        let now = Utc::now().to_rfc3339();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            completed,
            created_at: now.clone(),
            updated_at: now,
        };
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn update_by_id(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>> {
        let id = id.to_string();
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        task.updated_at = Utc::now().to_rfc3339();
        Ok(Some(task.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let id = id.to_string();
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn crud_round_trip() {
        let store = MemoryTaskStore::new();
        let task = store.insert("buy milk", false).await.unwrap();
        let id = Uuid::parse_str(&task.id).unwrap();

        let toggled = store
            .update_by_id(
                id,
                TaskPatch {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(toggled.completed);
        assert_eq!(toggled.title, "buy milk");

        assert!(store.delete_by_id(id).await.unwrap());
        assert!(!store.delete_by_id(id).await.unwrap());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = MemoryTaskStore::new();
        for title in ["a", "b", "c"] {
            store.insert(title, false).await.unwrap();
        }
        let titles: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }
}
