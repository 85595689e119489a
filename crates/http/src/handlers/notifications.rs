use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use therapy_core::Notification;
use therapy_storage::traits::NotificationStore;

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::UserQuery;

/// Most recent first.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = state
        .storage
        .list_notifications(&query.user_id, query.capped_limit())
        .await
        .map_err(therapy_service::ServiceError::from)?;
    Ok(Json(notifications))
}
