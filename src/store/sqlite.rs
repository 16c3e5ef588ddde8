// store/sqlite.rs — SQLite-backed task store (WAL mode).

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};
use uuid::Uuid;

use super::{Task, TaskPatch, TaskStore};

/// Default timeout for individual SQLite queries.
/// Prevents a hung store from blocking a request indefinitely.
const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Execute a future with the standard query timeout.
async fn with_timeout<T>(fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "database query timed out after {}s",
            QUERY_TIMEOUT.as_secs()
        )),
    }
}

#[derive(Clone)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    /// Open (creating if needed) `{data_dir}/tasks.db` and run migrations.
    ///
    /// An unreachable store is fatal: the error propagates to startup and the
    /// service exits. There is no retry loop.
    pub async fn connect(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;
        let db_path = data_dir.join("tasks.db");
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        let pool = SqlitePool::connect_with(opts)
            .await
            .context("failed to open task database")?;
        sqlx::migrate!("src/store/migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn list_all(&self) -> Result<Vec<Task>> {
        with_timeout(async {
            Ok(sqlx::query_as(
                "SELECT id, title, completed, created_at, updated_at FROM tasks ORDER BY rowid",
            )
            .fetch_all(&self.pool)
            .await?)
        })
        .await
    }

    async fn insert(&self, title: &str, completed: bool) -> Result<Task> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        with_timeout(async {
            sqlx::query(
                "INSERT INTO tasks (id, title, completed, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(title)
            .bind(completed)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await?;
            Ok(Task {
                id: id.clone(),
                title: title.to_string(),
                completed,
                created_at: now.clone(),
                updated_at: now.clone(),
            })
        })
        .await
    }

    async fn update_by_id(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>> {
        let id = id.to_string();
        let now = Utc::now().to_rfc3339();
        with_timeout(async {
            // Single atomic statement; COALESCE keeps unpatched fields.
            let result = sqlx::query(
                "UPDATE tasks
                 SET title = COALESCE(?, title),
                     completed = COALESCE(?, completed),
                     updated_at = ?
                 WHERE id = ?",
            )
            .bind(&patch.title)
            .bind(patch.completed)
            .bind(&now)
            .bind(&id)
            .execute(&self.pool)
            .await?;
            if result.rows_affected() == 0 {
                return Ok(None);
            }
            Ok(sqlx::query_as(
                "SELECT id, title, completed, created_at, updated_at FROM tasks WHERE id = ?",
            )
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?)
        })
        .await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let id = id.to_string();
        with_timeout(async {
            let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
                .bind(&id)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteTaskStore {
        let dir = tempfile::tempdir().unwrap().keep();
        SqliteTaskStore::connect(&dir).await.unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_lists_in_order() {
        let store = test_store().await;
        let first = store.insert("first", false).await.unwrap();
        let second = store.insert("second", true).await.unwrap();
        assert_ne!(first.id, second.id);

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "first");
        assert_eq!(all[1].title, "second");
        assert!(all[1].completed);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let store = test_store().await;
        let task = store.insert("walk the dog", false).await.unwrap();
        let id = Uuid::parse_str(&task.id).unwrap();

        let updated = store
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
        assert_eq!(updated.title, "walk the dog");
        assert!(updated.completed);
        assert_eq!(updated.created_at, task.created_at);
    }

    #[tokio::test]
    async fn unknown_id_misses_without_error() {
        let store = test_store().await;
        let ghost = Uuid::new_v4();
        assert!(store
            .update_by_id(ghost, TaskPatch::default())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_by_id(ghost).await.unwrap());
    }

    #[tokio::test]
    async fn delete_is_observable_in_list() {
        let store = test_store().await;
        let task = store.insert("ephemeral", false).await.unwrap();
        let id = Uuid::parse_str(&task.id).unwrap();
        assert!(store.delete_by_id(id).await.unwrap());
        assert!(store.list_all().await.unwrap().is_empty());
        // Second delete of the same id is a miss, not an error.
        assert!(!store.delete_by_id(id).await.unwrap());
    }
}
