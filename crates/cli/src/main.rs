use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use therapy_core::{DEFAULT_SESSION_EXPORT_DIR, env_non_empty};
use therapy_llm::LlmProvider;
use therapy_service::LlmService;
use therapy_storage::StorageBackend;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "therapy-tracker")]
#[command(about = "Therapy session tracker with LLM-assisted sessions and scheduled reminders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API together with the reminder and dispatch triggers
    Serve {
        /// Listen port [env: PORT, default 5000]
        #[arg(short, long)]
        port: Option<u16>,
        /// Listen address [env: HOST, default 0.0.0.0]
        #[arg(short = 'H', long)]
        host: Option<String>,
        /// Mount profile, session, task, journal, notification and LLM routes
        /// [env: ENABLE_STAGED_ROUTES]
        #[arg(long)]
        staged_routes: bool,
    },
    /// Create due reminders once and print the counts
    Remind,
    /// Send due notifications once and print the counts
    Dispatch,
    /// Write a session as pretty JSON
    ExportSession {
        id: String,
        /// Target directory [env: SESSION_EXPORT_DIR]
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Insert a previously exported session under a new id
    ImportSession { path: PathBuf },
    /// List the available therapy methods
    Methods,
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise the in-memory store.
pub(crate) async fn connect_storage() -> Result<Arc<StorageBackend>> {
    let url = env_non_empty("DATABASE_URL");
    let storage = StorageBackend::connect(url.as_deref()).await?;
    tracing::debug!(backend = storage.kind(), "Storage ready");
    Ok(Arc::new(storage))
}

/// LLM service from the environment. A missing or invalid provider leaves
/// chat disabled instead of failing startup.
pub(crate) fn llm_from_env() -> Arc<LlmService> {
    let provider = match LlmProvider::from_env() {
        Ok(provider) => Some(Arc::new(provider)),
        Err(e) => {
            tracing::warn!(error = %e, "LLM provider not configured, chat endpoints disabled");
            None
        },
    };
    Arc::new(LlmService::new(provider))
}

pub(crate) fn export_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| env_non_empty("SESSION_EXPORT_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_EXPORT_DIR))
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: failed to load .env: {e}");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host, staged_routes } => {
            commands::serve::run(port, host, staged_routes).await?;
        },
        Commands::Remind => commands::jobs::run_remind().await?,
        Commands::Dispatch => commands::jobs::run_dispatch().await?,
        Commands::ExportSession { id, dir } => commands::sessions::run_export(&id, dir).await?,
        Commands::ImportSession { path } => commands::sessions::run_import(&path).await?,
        Commands::Methods => commands::methods::run_methods()?,
    }

    Ok(())
}
