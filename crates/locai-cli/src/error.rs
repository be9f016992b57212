//! Error types for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use locai_runtime::AnalysisError;

/// Client errors returned by the API.
///
/// Provider failures are never surfaced here; they degrade to mock reports.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing or invalid 'text' field.")]
    InvalidBody,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidBody | ApiError::Analysis(AnalysisError::InvalidInput(_)) => {
                StatusCode::BAD_REQUEST
            }
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
