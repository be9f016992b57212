//! HTTP API routes.

use axum::{
    body::Bytes,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use locai_core::AnalysisRequest;
use locai_runtime::AnalysisOrchestrator;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: AnalysisOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Build the application router with CORS, tracing and the body limit.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "locai",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": state.orchestrator.mode()
    }))
}

async fn analyze(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse, ApiError> {
    let request = parse_request(&body)?;
    let report = state.orchestrator.analyze(&request).await?;
    Ok(Json(report))
}

/// Read the request body leniently.
///
/// `text` must be a string. `market` and `audience` are optional and any
/// non-string value is treated as absent.
fn parse_request(body: &[u8]) -> Result<AnalysisRequest, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidBody)?;

    let text = value
        .get("text")
        .and_then(Value::as_str)
        .ok_or(ApiError::InvalidBody)?;

    let optional = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

    Ok(AnalysisRequest {
        text: text.to_string(),
        market: optional("market"),
        audience: optional("audience"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_request() {
        let request =
            parse_request(br#"{"text": "Hi", "market": "Turkey", "audience": "students"}"#).unwrap();
        assert_eq!(request.text, "Hi");
        assert_eq!(request.market.as_deref(), Some("Turkey"));
        assert_eq!(request.audience.as_deref(), Some("students"));
    }

    #[test]
    fn test_non_string_optionals_ignored() {
        let request = parse_request(br#"{"text": "Hi", "market": 42, "audience": null}"#).unwrap();
        assert!(request.market.is_none());
        assert!(request.audience.is_none());
    }

    #[test]
    fn test_invalid_bodies() {
        assert!(matches!(parse_request(b"not json"), Err(ApiError::InvalidBody)));
        assert!(matches!(parse_request(br#"{"text": 5}"#), Err(ApiError::InvalidBody)));
        assert!(matches!(parse_request(br#"{"market": "DE"}"#), Err(ApiError::InvalidBody)));
        assert!(matches!(parse_request(br#"["text"]"#), Err(ApiError::InvalidBody)));
    }
}
