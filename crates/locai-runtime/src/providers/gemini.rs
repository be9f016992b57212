//! Google Gemini provider implementation.
//!
//! Uses the `generateContent` endpoint. System messages become the
//! `systemInstruction`; user messages become `user` contents.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::secrets::{ApiCredential, CredentialSource};
use super::{
    Completion, GenerationConfig, LlmProvider, PromptMessage, PromptRole, ProviderError, TokenUsage,
};
use crate::config::GeminiConfig;

/// Environment variable name for the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini `generateContent` client.
pub struct GeminiClient {
    credential: Option<ApiCredential>,
    base_url: String,
    #[cfg(feature = "gemini")]
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiClient {
    /// Create a client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::build(
            Some(ApiCredential::new(
                api_key,
                CredentialSource::Programmatic,
                "Gemini API key",
            )),
            GeminiConfig::default().base_url,
        )
    }

    /// Create a client from configuration with environment fallback for the key.
    pub fn from_config(config: &GeminiConfig) -> Self {
        let credential = match ApiCredential::from_config_or_env(
            config.api_key.as_deref(),
            GEMINI_API_KEY_ENV,
            "Gemini API key",
        ) {
            Ok(credential) => {
                tracing::debug!(provider = "gemini", source = %credential.source(), "Using Gemini API key");
                Some(credential)
            }
            Err(e) => {
                tracing::debug!(provider = "gemini", error = %e, "Gemini credentials not available");
                None
            }
        };

        Self::build(credential, config.base_url.clone())
    }

    fn build(credential: Option<ApiCredential>, base_url: String) -> Self {
        Self {
            credential,
            base_url: base_url.trim_end_matches('/').to_string(),
            #[cfg(feature = "gemini")]
            client: reqwest::Client::new(),
        }
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

fn build_request(messages: Vec<PromptMessage>, config: &GenerationConfig) -> GeminiRequest {
    let mut system = Vec::new();
    let mut contents = Vec::new();

    for msg in messages {
        match msg.role {
            PromptRole::System => system.push(GeminiPart { text: msg.content }),
            PromptRole::User => contents.push(GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart { text: msg.content }],
            }),
        }
    }

    GeminiRequest {
        contents,
        system_instruction: (!system.is_empty()).then(|| GeminiSystemInstruction { parts: system }),
        generation_config: GeminiGenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
        },
    }
}

fn into_completion(body: GeminiResponse, model: &str) -> Result<Completion, ProviderError> {
    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ParseError("Response contained no candidates".to_string()))?;

    let content = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default();

    let usage = body
        .usage_metadata
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
        })
        .unwrap_or_default();

    Ok(Completion {
        content,
        usage,
        model: body.model_version.unwrap_or_else(|| model.to_string()),
        finish_reason: candidate.finish_reason,
    })
}

#[async_trait]
impl LlmProvider for GeminiClient {
    #[cfg(feature = "gemini")]
    async fn complete(
        &self,
        messages: Vec<PromptMessage>,
        config: &GenerationConfig,
    ) -> Result<Completion, ProviderError> {
        let credential = self.credential.as_ref().ok_or_else(|| {
            ProviderError::NotConfigured(format!("{} not set", GEMINI_API_KEY_ENV))
        })?;

        let request = build_request(messages, config);

        // SECURITY: Only expose the credential here, at the point of use
        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, config.model))
            .header("x-goog-api-key", credential.expose())
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| super::http::send_error(e, config.timeout))?;

        let body: GeminiResponse = super::http::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        into_completion(body, &config.model)
    }

    #[cfg(not(feature = "gemini"))]
    async fn complete(
        &self,
        _messages: Vec<PromptMessage>,
        _config: &GenerationConfig,
    ) -> Result<Completion, ProviderError> {
        Err(ProviderError::NotConfigured(
            "Gemini client requires 'gemini' feature".to_string(),
        ))
    }

    fn is_configured(&self) -> bool {
        cfg!(feature = "gemini") && self.credential.as_ref().is_some_and(|c| !c.is_empty())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
