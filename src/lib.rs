pub mod cli;
pub mod config;
pub mod error;
pub mod rest;
pub mod store;

use std::sync::Arc;

use config::AppConfig;
use store::TaskStore;

/// Shared application state passed to every route handler.
///
/// Constructed once in `main` and handed to the router as axum state; route
/// handlers never reach for globals. Swapping `store` for the in-memory
/// implementation is all a test needs to run without SQLite on disk.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn TaskStore>,
    pub started_at: std::time::Instant,
}
