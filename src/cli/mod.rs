// cli/mod.rs — `taskd list/add/done/rm` one-shot client commands.
//
// Non-interactive counterparts of the `taskd ui` terminal client. Each
// command talks to a running server over the REST API and prints a short
// human-readable result.

pub mod client;
pub mod ui;

use anyhow::{bail, Result};

use client::ApiClient;

/// `taskd list`
pub async fn cmd_list(client: &ApiClient) -> Result<()> {
    let tasks = client.list_tasks().await?;
    if tasks.is_empty() {
        println!("No tasks yet.");
        return Ok(());
    }

    println!("{:<38} {:<6} {}", "Id", "Done", "Title");
    println!("{}", "-".repeat(70));
    for task in &tasks {
        let done = if task.completed { "[x]" } else { "[ ]" };
        println!("{:<38} {:<6} {}", task.id, done, task.title);
    }
    println!("\n{} tasks", tasks.len());
    Ok(())
}

/// `taskd add <title>`
pub async fn cmd_add(client: &ApiClient, title: &str) -> Result<()> {
    if title.trim().is_empty() {
        bail!("please enter a task title");
    }
    let task = client.create_task(title.trim()).await?;
    println!("✓ Task added: {} ({})", task.title, task.id);
    Ok(())
}

/// `taskd done <id>` — toggles completion, matching the UI's click-to-toggle.
pub async fn cmd_done(client: &ApiClient, id: &str) -> Result<()> {
    let tasks = client.list_tasks().await?;
    let Some(task) = tasks.iter().find(|t| t.id == id) else {
        bail!("no task with id {id}");
    };
    let updated = client.set_completed(id, !task.completed).await?;
    let state = if updated.completed { "done" } else { "not done" };
    println!("✓ {} is now {state}", updated.title);
    Ok(())
}

/// `taskd rm <id>`
pub async fn cmd_rm(client: &ApiClient, id: &str) -> Result<()> {
    client.delete_task(id).await?;
    println!("✓ Task {id} deleted");
    Ok(())
}
