use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use therapy_core::{Session, SessionMessage};
use therapy_service::StartSession;

use super::deleted;
use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::{ListQuery, SendMessageRequest};
use crate::response_types::{DeletedResponse, ExportResponse};

pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Session>>, ApiError> {
    let sessions = state.sessions.list_sessions(&profile_id, query.capped_limit()).await?;
    Ok(Json(sessions))
}

pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Json(params): Json<StartSession>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let session = state.sessions.start_session(&profile_id, params).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(state.sessions.get_session(&id).await?))
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<SessionMessage>, ApiError> {
    Ok(Json(state.sessions.send_message(&id, &req.content).await?))
}

pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(state.sessions.end_session(&id).await?))
}

pub async fn export_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ExportResponse>, ApiError> {
    let path = state.sessions.export_session(&id).await?;
    Ok(Json(ExportResponse { session_id: id, path: path.display().to_string() }))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let removed = state.sessions.delete_session(&id).await?;
    deleted("session", id, removed)
}
