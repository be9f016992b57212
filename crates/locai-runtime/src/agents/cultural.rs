use std::sync::Arc;

use locai_core::{mock_cultural, parse_cultural_response, CulturalReport, ValidatedRequest};

use super::AgentError;
use crate::prompts::{build_cultural_prompt, CULTURAL_SYSTEM_PROMPT};
use crate::providers::{GenerationConfig, LlmProvider, PromptMessage};

/// Cultural and tone-of-voice half of the analysis.
pub struct CulturalAgent {
    provider: Arc<dyn LlmProvider>,
    completion: GenerationConfig,
}

impl CulturalAgent {
    pub fn new(provider: Arc<dyn LlmProvider>, completion: GenerationConfig) -> Self {
        Self {
            provider,
            completion,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Audit the copy, falling back to the mock report on any failure.
    pub async fn analyze(&self, request: &ValidatedRequest) -> CulturalReport {
        match self.try_analyze(request).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "Cultural analysis failed, using mock report"
                );
                mock_cultural(&request.text)
            }
        }
    }

    /// Single model call with timeout and parsing, no fallback.
    pub async fn try_analyze(&self, request: &ValidatedRequest) -> Result<CulturalReport, AgentError> {
        let messages = vec![
            PromptMessage::system(CULTURAL_SYSTEM_PROMPT.trim()),
            PromptMessage::user(build_cultural_prompt(
                &request.text,
                &request.market,
                &request.audience,
            )),
        ];

        let timeout = self.completion.timeout;
        let response = tokio::time::timeout(timeout, self.provider.complete(messages, &self.completion))
            .await
            .map_err(|_| AgentError::Timeout(timeout))??;

        if response.is_truncated() {
            tracing::warn!(
                provider = self.provider.name(),
                model = %response.model,
                max_tokens = self.completion.max_tokens,
                "Cultural response hit the output token limit"
            );
        }

        let parsed = parse_cultural_response(&response.content)?;
        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            stage = ?parsed.stage,
            score_estimated = parsed.score_estimated,
            tokens = response.usage.total(),
            "Parsed cultural response"
        );

        Ok(parsed.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Completion, PromptRole, ProviderError, TokenUsage};
    use async_trait::async_trait;
    use locai_core::{AnalysisRequest, Provenance};

    struct CannedProvider(&'static str);

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete(
            &self,
            messages: Vec<PromptMessage>,
            _config: &GenerationConfig,
        ) -> Result<Completion, ProviderError> {
            assert_eq!(messages[0].role, PromptRole::System);
            assert!(messages[1].content.contains("Target market: Brazil"));
            Ok(Completion {
                content: self.0.to_string(),
                usage: TokenUsage::default(),
                model: "canned".to_string(),
                finish_reason: None,
            })
        }

        fn is_configured(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    fn request() -> ValidatedRequest {
        AnalysisRequest::new("Summer sale: every bikini half price!")
            .with_market("Brazil")
            .validate()
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_response_used() {
        let agent = CulturalAgent::new(
            Arc::new(CannedProvider(
                r#"```json
{"overallScore": 88, "culturalRiskSummary": "Fits the market.", "toneSummary": "Upbeat.", "topRisks": ["None notable"], "improvementIdeas": ["Mention local holidays"]}
```"#,
            )),
            GenerationConfig::default(),
        );

        let report = agent.analyze(&request()).await;
        assert_eq!(report.mode, Provenance::Live);
        assert_eq!(report.overall_score, 88);
        assert_eq!(report.tone_summary, "Upbeat.");
    }

    #[tokio::test]
    async fn test_garbage_response_falls_back() {
        let agent = CulturalAgent::new(
            Arc::new(CannedProvider("Sorry, I can't help with that.")),
            GenerationConfig::default(),
        );

        assert!(matches!(
            agent.try_analyze(&request()).await,
            Err(AgentError::Parse(_))
        ));

        let report = agent.analyze(&request()).await;
        assert_eq!(report, mock_cultural(&request().text));
    }
}
