use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use therapy_core::{EmotionalStateInput, Profile, ProfileInput, ProfileUpdate};

use super::deleted;
use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::UserQuery;
use crate::response_types::DeletedResponse;

pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Profile>>, ApiError> {
    let profiles = state.profiles.list_profiles(&query.user_id, query.capped_limit()).await?;
    Ok(Json(profiles))
}

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ProfileInput>,
) -> Result<(StatusCode, Json<Profile>), ApiError> {
    let profile = state.profiles.create_profile(input).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(state.profiles.get_profile(&id).await?))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(state.profiles.update_profile(&id, update).await?))
}

pub async fn add_emotional_state(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<EmotionalStateInput>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(state.profiles.add_emotional_state(&id, input).await?))
}

pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let removed = state.profiles.delete_profile(&id).await?;
    deleted("profile", id, removed)
}
