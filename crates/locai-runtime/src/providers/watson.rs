//! IBM Watson Natural Language Understanding client.
//!
//! Authentication is a two-step exchange: the API key is traded for an IAM
//! bearer token, which is cached and reused until shortly before it expires.
//! The cache is the only state shared between requests.

use async_trait::async_trait;
use locai_core::{EmotionScores, SentimentSignal};
use parking_lot::Mutex;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::secrets::{ApiCredential, CredentialSource};
use super::{ProviderError, SentimentProvider};
use crate::config::WatsonConfig;

/// Environment variable name for the Watson NLU API key.
pub const IBM_API_KEY_ENV: &str = "IBM_API_KEY";

/// Tokens are refreshed this long before IAM says they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Used when IAM omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Cached IAM bearer token.
struct CachedToken {
    token: Arc<ApiCredential>,
    refresh_at: Instant,
}

/// Watson NLU sentiment + emotion client.
pub struct WatsonClient {
    credential: Option<ApiCredential>,
    service_url: Option<String>,
    iam_url: String,
    version: String,
    timeout: Duration,
    token: Mutex<Option<CachedToken>>,
    #[cfg(feature = "watson")]
    client: reqwest::Client,
}

impl std::fmt::Debug for WatsonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatsonClient")
            .field("credential", &self.credential)
            .field("service_url", &self.service_url)
            .field("iam_url", &self.iam_url)
            .field("version", &self.version)
            .finish()
    }
}

impl WatsonClient {
    /// Create a client with an explicit key and service URL.
    pub fn new(api_key: impl Into<String>, service_url: impl Into<String>) -> Self {
        let defaults = WatsonConfig::default();
        Self::build(
            Some(ApiCredential::new(
                api_key,
                CredentialSource::Programmatic,
                "IBM Watson API key",
            )),
            Some(service_url.into()),
            defaults.iam_url,
            defaults.version,
        )
    }

    /// Create a client from configuration with environment fallback for the key.
    ///
    /// Missing credentials do not fail construction; the client then reports
    /// itself unconfigured.
    pub fn from_config(config: &WatsonConfig) -> Self {
        let credential = match ApiCredential::from_config_or_env(
            config.api_key.as_deref(),
            IBM_API_KEY_ENV,
            "IBM Watson API key",
        ) {
            Ok(credential) => {
                tracing::debug!(provider = "watson", source = %credential.source(), "Using Watson API key");
                Some(credential)
            }
            Err(e) => {
                tracing::debug!(provider = "watson", error = %e, "Watson credentials not available");
                None
            }
        };

        Self::build(
            credential,
            config.service_url.clone(),
            config.iam_url.clone(),
            config.version.clone(),
        )
    }

    fn build(
        credential: Option<ApiCredential>,
        service_url: Option<String>,
        iam_url: String,
        version: String,
    ) -> Self {
        Self {
            credential,
            service_url: service_url.map(|url| url.trim_end_matches('/').to_string()),
            iam_url: iam_url.trim_end_matches('/').to_string(),
            version,
            timeout: Duration::from_secs(8),
            token: Mutex::new(None),
            #[cfg(feature = "watson")]
            client: reqwest::Client::new(),
        }
    }

    /// Set the IAM host (tests point this at a local server).
    pub fn with_iam_url(mut self, url: impl Into<String>) -> Self {
        self.iam_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg_attr(not(feature = "watson"), allow(dead_code))]
    fn cached_token(&self) -> Option<Arc<ApiCredential>> {
        let guard = self.token.lock();
        guard
            .as_ref()
            .filter(|cached| Instant::now() < cached.refresh_at)
            .map(|cached| Arc::clone(&cached.token))
    }

    #[cfg_attr(not(feature = "watson"), allow(dead_code))]
    fn clear_token(&self) {
        *self.token.lock() = None;
    }

    #[cfg_attr(not(feature = "watson"), allow(dead_code))]
    fn store_token(&self, token: String, expires_in: Option<u64>) -> Arc<ApiCredential> {
        let lifetime = expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let token = Arc::new(ApiCredential::new(
            token,
            CredentialSource::Programmatic,
            "IBM IAM token",
        ));

        *self.token.lock() = Some(CachedToken {
            token: Arc::clone(&token),
            refresh_at: Instant::now() + lifetime.saturating_sub(TOKEN_REFRESH_MARGIN),
        });

        token
    }
}

#[cfg(feature = "watson")]
#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    sentiment: Option<SentimentResult>,
    #[serde(default)]
    emotion: Option<EmotionResult>,
}

#[derive(Debug, Deserialize)]
struct SentimentResult {
    document: Option<DocumentSentiment>,
}

#[derive(Debug, Deserialize)]
struct DocumentSentiment {
    score: Option<f64>,
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmotionResult {
    document: Option<DocumentEmotion>,
}

#[derive(Debug, Deserialize)]
struct DocumentEmotion {
    emotion: Option<EmotionScores>,
}

impl AnalyzeResponse {
    fn into_signal(self) -> SentimentSignal {
        let document = self.sentiment.and_then(|s| s.document);
        let emotions = self
            .emotion
            .and_then(|e| e.document)
            .and_then(|d| d.emotion)
            .unwrap_or_default();

        SentimentSignal {
            score: document.as_ref().and_then(|d| d.score).unwrap_or(0.0),
            label: document.and_then(|d| d.label),
            emotions,
        }
    }
}

#[cfg(feature = "watson")]
impl WatsonClient {
    async fn bearer_token(&self) -> Result<Arc<ApiCredential>, ProviderError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let credential = self.credential.as_ref().ok_or_else(|| {
            ProviderError::NotConfigured(format!("{} not set", IBM_API_KEY_ENV))
        })?;

        // SECURITY: Only expose the key here, in the form body
        let response = self
            .client
            .post(format!("{}/identity/token", self.iam_url))
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
                ("apikey", credential.expose()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| super::http::send_error(e, self.timeout))?;

        let body: IamTokenResponse = super::http::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        tracing::debug!(provider = "watson", expires_in = ?body.expires_in, "Obtained IAM token");
        Ok(self.store_token(body.access_token, body.expires_in))
    }
}

#[async_trait]
impl SentimentProvider for WatsonClient {
    #[cfg(feature = "watson")]
    async fn analyze(&self, text: &str, language: &str) -> Result<SentimentSignal, ProviderError> {
        let service_url = self.service_url.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured("Watson service URL not set".to_string())
        })?;
        let token = self.bearer_token().await?;

        let request = serde_json::json!({
            "text": text,
            "language": language,
            "features": {
                "sentiment": {},
                "emotion": {}
            }
        });

        let response = self
            .client
            .post(format!("{}/v1/analyze", service_url))
            .query(&[("version", self.version.as_str())])
            .bearer_auth(token.expose())
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| super::http::send_error(e, self.timeout))?;

        let response = match super::http::check_status(response).await {
            Ok(response) => response,
            Err(ProviderError::AuthError) => {
                // the token may have been revoked; fetch a new one next time
                self.clear_token();
                return Err(ProviderError::AuthError);
            }
            Err(e) => return Err(e),
        };

        let body: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(body.into_signal())
    }

    #[cfg(not(feature = "watson"))]
    async fn analyze(&self, _text: &str, _language: &str) -> Result<SentimentSignal, ProviderError> {
        Err(ProviderError::NotConfigured(
            "Watson client requires 'watson' feature".to_string(),
        ))
    }

    fn is_configured(&self) -> bool {
        cfg!(feature = "watson")
            && self.credential.as_ref().is_some_and(|c| !c.is_empty())
            && self.service_url.is_some()
    }

    fn name(&self) -> &str {
        "watson"
    }
}
