use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use taskd::cli::{self, client::ApiClient};
use taskd::config::AppConfig;
use taskd::rest;
use taskd::store::SqliteTaskStore;
use taskd::AppContext;

#[derive(Parser)]
#[command(
    name = "taskd",
    about = "taskd — task tracker HTTP service and terminal client",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port
    #[arg(long, env = "TASKD_PORT")]
    port: Option<u16>,

    /// Data directory for the task database (required to serve)
    #[arg(long, env = "TASKD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory holding the prebuilt web bundle
    #[arg(long, env = "TASKD_ASSETS_DIR")]
    assets_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASKD_LOG")]
    log: Option<String>,

    /// Server base URL for client commands
    #[arg(long, env = "TASKD_URL", default_value = "http://127.0.0.1:8080")]
    url: String,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default when no subcommand given).
    Serve,
    /// Interactive terminal client.
    Ui,
    /// List all tasks.
    List,
    /// Add a task.
    Add {
        /// Task title (words are joined with spaces)
        title: Vec<String>,
    },
    /// Toggle a task's completion by id.
    Done { id: String },
    /// Delete a task by id.
    Rm { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = Args::parse();
    let command = args.command.take();
    let serving = matches!(command, None | Some(Command::Serve));

    // Client commands default to warn so the terminal output stays clean.
    let filter = args
        .log
        .clone()
        .unwrap_or_else(|| if serving { "info".into() } else { "warn".into() });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();

    match command {
        None | Some(Command::Serve) => serve(args).await,
        Some(Command::Ui) => cli::ui::run_ui(ApiClient::new(args.url)).await,
        Some(Command::List) => cli::cmd_list(&ApiClient::new(args.url)).await,
        Some(Command::Add { title }) => {
            cli::cmd_add(&ApiClient::new(args.url), &title.join(" ")).await
        }
        Some(Command::Done { id }) => cli::cmd_done(&ApiClient::new(args.url), &id).await,
        Some(Command::Rm { id }) => cli::cmd_rm(&ApiClient::new(args.url), &id).await,
    }
}

async fn serve(args: Args) -> Result<()> {
    let config = Arc::new(AppConfig::new(
        args.port,
        args.data_dir,
        args.assets_dir,
        args.log,
    )?);

    // Store connectivity is checked up front; an unreachable store is fatal.
    let store = Arc::new(SqliteTaskStore::connect(&config.data_dir).await?);

    let ctx = Arc::new(AppContext {
        config,
        store,
        started_at: std::time::Instant::now(),
    });
    rest::start_rest_server(ctx).await
}
