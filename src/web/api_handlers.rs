// src/web/api_handlers.rs
use crate::{
    error::AppError,
    models::{stats::AdmissionStats, student::StatusChangeRequest},
    services::student_service,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// JSON flavour of `AppError` for the admin API.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.status_and_message();
        if status.is_server_error() {
            tracing::error!("API request failed: {:?}", self.0);
        } else {
            tracing::warn!("API request refused: {}", self.0);
        }
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct StatusChangeResponse {
    pub success: bool,
    pub new_status: String,
}

// POST /admin/api/student/{id}/status
pub async fn change_student_status(
    State(state): State<AppState>,
    student_id: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<Json<StatusChangeResponse>, ApiError> {
    // A non-numeric id cannot name a student
    let Path(student_id) = student_id.map_err(|e| {
        tracing::warn!("Status change for a malformed student id: {}", e);
        ApiError(AppError::StudentIdMalformed)
    })?;

    // A missing or malformed body is treated like an empty object.
    let requested = serde_json::from_slice::<StatusChangeRequest>(&body)
        .map(|req| req.requested_status())
        .unwrap_or_default();
    tracing::info!("Status change requested for student {}: '{}'", student_id, requested);

    let student =
        student_service::set_status(&state.db_pool, &state.notifier, student_id, &requested).await?;

    Ok(Json(StatusChangeResponse {
        success: true,
        new_status: student.status.to_string(),
    }))
}

// GET /admin/api/stats
pub async fn admission_stats(State(state): State<AppState>) -> Result<Json<AdmissionStats>, ApiError> {
    Ok(Json(student_service::admission_stats(&state.db_pool).await?))
}
