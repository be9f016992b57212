//! Provider abstractions for locai-runtime.
//!
//! Two kinds of external services are used:
//! - a [`SentimentProvider`] returning polarity and emotion intensities
//!   (IBM Watson NLU)
//! - an [`LlmProvider`] answering a system + user prompt (Google Gemini)
//!
//! HTTP clients are gated behind the `watson` and `gemini` features. Without
//! them the clients still exist but report themselves unconfigured.
//!
//! ## Security
//!
//! All clients use [`ApiCredential`] for keys and tokens.

use async_trait::async_trait;
use locai_core::SentimentSignal;
use std::time::Duration;
use thiserror::Error;

pub mod gemini;
pub mod secrets;
pub mod watson;

#[cfg(any(feature = "watson", feature = "gemini"))]
mod http;

pub use gemini::{GeminiClient, GEMINI_API_KEY_ENV};
pub use secrets::{ApiCredential, CredentialSource};
pub use watson::{WatsonClient, IBM_API_KEY_ENV};

/// Errors from provider clients.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Model and sampling settings for one generation call.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub model: String,

    /// Output token limit
    pub max_tokens: u32,

    pub temperature: f32,

    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gemini-flash-latest".to_string(),
            max_tokens: 1024,
            temperature: 0.2,
            timeout: Duration::from_secs(8),
        }
    }
}

/// Who a prompt message speaks as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    /// Standing instructions for the model
    System,
    /// The request itself
    User,
}

/// One message of a model prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }
}

/// Text produced by a generative model.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,

    pub usage: TokenUsage,

    /// Model version that answered
    pub model: String,

    /// Why generation stopped, as reported by the provider (e.g. `MAX_TOKENS`)
    pub finish_reason: Option<String>,
}

impl Completion {
    /// True when the provider cut the answer off at the output token limit.
    pub fn is_truncated(&self) -> bool {
        self.finish_reason
            .as_deref()
            .is_some_and(|reason| reason.eq_ignore_ascii_case("MAX_TOKENS"))
    }
}

/// Token usage from a completion.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used.
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// A generative model backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for the prompt.
    async fn complete(
        &self,
        messages: Vec<PromptMessage>,
        config: &GenerationConfig,
    ) -> Result<Completion, ProviderError>;

    /// Whether credentials (and the client feature) are available.
    fn is_configured(&self) -> bool;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

/// A sentiment and emotion analysis backend.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Analyze document-level sentiment and emotion.
    async fn analyze(&self, text: &str, language: &str) -> Result<SentimentSignal, ProviderError>;

    /// Whether credentials (and the client feature) are available.
    fn is_configured(&self) -> bool;

    /// Provider name for logs.
    fn name(&self) -> &str;
}
