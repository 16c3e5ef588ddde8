// cli/client.rs — HTTP client for the taskd REST API.

use anyhow::{bail, Context as _, Result};
use serde_json::json;

use crate::store::Task;

/// Thin wrapper over reqwest against a running taskd server.
/// Cloneable; the underlying connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let resp = self
            .http
            .get(format!("{}/api/tasks", self.base_url))
            .send()
            .await
            .context("failed to reach taskd — is the server running?")?;
        let resp = check(resp).await?;
        Ok(resp.json().await?)
    }

    pub async fn create_task(&self, title: &str) -> Result<Task> {
        let resp = self
            .http
            .post(format!("{}/api/tasks", self.base_url))
            .json(&json!({ "title": title, "completed": false }))
            .send()
            .await?;
        let resp = check(resp).await?;
        Ok(resp.json().await?)
    }

    pub async fn set_completed(&self, id: &str, completed: bool) -> Result<Task> {
        let resp = self
            .http
            .put(format!("{}/api/tasks/{id}", self.base_url))
            .json(&json!({ "completed": completed }))
            .send()
            .await?;
        let resp = check(resp).await?;
        Ok(resp.json().await?)
    }

    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let resp = self
            .http
            .delete(format!("{}/api/tasks/{id}", self.base_url))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| "unknown server error".to_string());
    bail!("{status}: {message}")
}
