use axum::{Json, extract::Path};

use therapy_core::{THERAPY_METHODS, TherapyMethod, find_therapy_method};

use crate::api_error::ApiError;

pub async fn list_methods() -> Json<&'static [TherapyMethod]> {
    Json(THERAPY_METHODS)
}

pub async fn get_method(Path(key): Path<String>) -> Result<Json<&'static TherapyMethod>, ApiError> {
    find_therapy_method(&key).map(Json).ok_or_else(|| ApiError::not_found("therapy method", &key))
}
