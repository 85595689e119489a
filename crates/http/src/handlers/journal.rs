use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use therapy_core::{JournalEntry, JournalInput};

use super::deleted;
use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::ListQuery;
use crate::response_types::DeletedResponse;

pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    Ok(Json(state.journal.list_entries(&profile_id, query.capped_limit()).await?))
}

pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Json(input): Json<JournalInput>,
) -> Result<(StatusCode, Json<JournalEntry>), ApiError> {
    let entry = state.journal.create_entry(&profile_id, input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JournalEntry>, ApiError> {
    Ok(Json(state.journal.get_entry(&id).await?))
}

pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<JournalInput>,
) -> Result<Json<JournalEntry>, ApiError> {
    Ok(Json(state.journal.update_entry(&id, input).await?))
}

pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let removed = state.journal.delete_entry(&id).await?;
    deleted("journal entry", id, removed)
}
