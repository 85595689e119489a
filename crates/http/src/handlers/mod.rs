pub mod journal;
pub mod llm;
pub mod methods;
pub mod notifications;
pub mod profiles;
pub mod prompts;
pub mod sessions;
pub mod tasks;

use axum::Json;

use crate::api_error::ApiError;
use crate::response_types::DeletedResponse;

/// 404 unless something was actually removed.
pub(crate) fn deleted(entity: &str, id: String, removed: bool) -> Result<Json<DeletedResponse>, ApiError> {
    if !removed {
        return Err(ApiError::not_found(entity, &id));
    }
    Ok(Json(DeletedResponse { deleted: true, id }))
}
