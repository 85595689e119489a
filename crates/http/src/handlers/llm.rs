use std::sync::Arc;

use axum::{Json, extract::State};
use therapy_service::{GenerateRequest, GenerateResponse};

use crate::AppState;
use crate::api_error::ApiError;

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    Ok(Json(state.llm.generate(request).await?))
}
