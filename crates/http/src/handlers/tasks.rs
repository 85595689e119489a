use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use therapy_core::{Task, TaskInput, TaskUpdate};

use super::deleted;
use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::{CompleteQuery, TaskListQuery};
use crate::response_types::DeletedResponse;

pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.tasks.list_tasks(&profile_id, query.include_completed).await?))
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Json(input): Json<TaskInput>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.tasks.create_task(&profile_id, input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.tasks.get_task(&id).await?))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.tasks.update_task(&id, update).await?))
}

pub async fn complete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<CompleteQuery>,
) -> Result<Json<Task>, ApiError> {
    let completed = query.completed.unwrap_or(true);
    Ok(Json(state.tasks.set_completed(&id, completed).await?))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let removed = state.tasks.delete_task(&id).await?;
    deleted("task", id, removed)
}
