use std::any::Any;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Local;
use serde_json::json;
use tracing::error;

use bossreport_core::{AnalysisResponse, AnalyzeError, Submission};

use super::AppState;

const GENERIC_ERROR: &str = "An unexpected error occurred";

/// Errors surfaced to the widget as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    InvalidPayload(serde_json::Error),
    Analyze(AnalyzeError),
}

impl From<AnalyzeError> for ApiError {
    fn from(e: AnalyzeError) -> Self {
        ApiError::Analyze(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidPayload(e) => {
                (StatusCode::BAD_REQUEST, format!("Invalid JSON payload: {}", e))
            }
            ApiError::Analyze(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Analyze(e) => {
                error!(error = %e, "Error in boss_analyze");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Turns a panic in a handler into the generic 500 body
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": GENERIC_ERROR })),
    )
        .into_response()
}

/// `POST /boss_analyze`
///
/// The body is read as JSON whatever its content type.
pub async fn boss_analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let submission: Submission =
        serde_json::from_slice(&body).map_err(ApiError::InvalidPayload)?;

    let today = Local::now().date_naive();
    let response = state.pipeline.analyze(&submission, today).await?;

    Ok(Json(response))
}
