use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use therapy_core::{Prompt, PromptInput, PromptUpdate};

use super::deleted;
use crate::AppState;
use crate::api_error::ApiError;
use crate::response_types::DeletedResponse;

pub async fn list_prompts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Prompt>>, ApiError> {
    Ok(Json(state.prompts.list_prompts().await?))
}

pub async fn create_prompt(
    State(state): State<Arc<AppState>>,
    Json(input): Json<PromptInput>,
) -> Result<(StatusCode, Json<Prompt>), ApiError> {
    let prompt = state.prompts.create_prompt(input).await?;
    Ok((StatusCode::CREATED, Json(prompt)))
}

pub async fn get_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Prompt>, ApiError> {
    Ok(Json(state.prompts.get_prompt(&id).await?))
}

pub async fn update_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<PromptUpdate>,
) -> Result<Json<Prompt>, ApiError> {
    Ok(Json(state.prompts.update_prompt(&id, update).await?))
}

pub async fn delete_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let removed = state.prompts.delete_prompt(&id).await?;
    deleted("prompt", id, removed)
}
