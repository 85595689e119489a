use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use therapy_service::{PromptService, SessionService};

use crate::{connect_storage, export_dir, llm_from_env};

async fn session_service(dir: PathBuf) -> Result<SessionService> {
    let storage = connect_storage().await?;
    let prompts = Arc::new(PromptService::new(Arc::clone(&storage)));
    Ok(SessionService::new(storage, llm_from_env(), prompts, dir))
}

pub(crate) async fn run_export(id: &str, dir: Option<PathBuf>) -> Result<()> {
    let service = session_service(export_dir(dir)).await?;
    let path = service.export_session(id).await?;
    println!("{}", path.display());
    Ok(())
}

pub(crate) async fn run_import(path: &Path) -> Result<()> {
    let service = session_service(export_dir(None)).await?;
    let session = service.import_session(path).await?;
    println!("{}", session.id);
    Ok(())
}
