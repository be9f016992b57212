//! Shared HTTP plumbing for the reqwest-backed clients.

use std::time::Duration;

use super::ProviderError;

/// Map a transport-level failure.
pub(crate) fn send_error(error: reqwest::Error, timeout: Duration) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout(timeout)
    } else {
        ProviderError::HttpError(error.to_string())
    }
}

/// Pass 2xx responses through and turn everything else into a [`ProviderError`].
///
/// 401/403 are authentication failures, 429 is rate limiting (with the
/// `retry-after` header when it is given in seconds), any other status is an
/// API error carrying the provider's message.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == 401 || status == 403 {
        return Err(ProviderError::AuthError);
    }

    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(ProviderError::RateLimited { retry_after });
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::ApiError {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"error": "..."}` (Watson), `{"error": {"message": "..."}}`
/// (Gemini) and `{"errorMessage": "..."}` (IAM); anything else is returned
/// as-is.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    value["error"]["message"]
        .as_str()
        .or_else(|| value["error"].as_str())
        .or_else(|| value["errorMessage"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
