//! Runtime orchestrator for concurrent copy analysis.
//!
//! The orchestrator implements:
//! - Validation before any provider is contacted
//! - Mock mode when forced or when either provider lacks credentials
//! - Parallel fan-out of both agents as tokio tasks, joined with `tokio::join!`
//! - Deterministic fan-in through the Synthesizer
//!
//! Agents never fail; a task that panics is replaced by the mock report for
//! its half, so a report is always produced for valid input.

use std::sync::Arc;
use thiserror::Error;

use locai_core::{
    mock_cultural, mock_sentiment, AnalysisReport, AnalysisRequest, CulturalReport, Provenance,
    SentimentReport, Synthesizer, ValidatedRequest, ValidationError,
};

use crate::agents::{CulturalAgent, SentimentAgent};
use crate::config::RuntimeConfig;
use crate::providers::{
    GenerationConfig, GeminiClient, LlmProvider, SentimentProvider, WatsonClient,
};

/// Errors from the orchestrator. Only client input can fail an analysis.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidInput(#[from] ValidationError),
}

/// Runs both analyses for a request and merges the results.
pub struct AnalysisOrchestrator {
    sentiment: Arc<SentimentAgent>,
    cultural: Arc<CulturalAgent>,
    force_mock: bool,
    synthesizer: Synthesizer,
}

impl AnalysisOrchestrator {
    /// Build an orchestrator with the Watson and Gemini clients described by `config`.
    pub fn from_config(config: RuntimeConfig) -> Self {
        OrchestratorBuilder::new().config(config).build()
    }

    /// Whether requests will be served by live providers.
    pub fn mode(&self) -> Provenance {
        if self.force_mock || !self.sentiment.is_configured() || !self.cultural.is_configured() {
            Provenance::Mock
        } else {
            Provenance::Live
        }
    }

    /// Analyze one request.
    ///
    /// # Execution Flow
    /// 1. Validate (no provider calls on invalid input)
    /// 2. Mock mode: both halves from the fallback generator
    /// 3. Otherwise fan-out both agents concurrently and join both
    /// 4. Fan-in: synthesize the final report
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        let validated = request.validate()?;

        let (sentiment, cultural) = match self.mode() {
            Provenance::Mock => {
                tracing::debug!(
                    force_mock = self.force_mock,
                    sentiment_configured = self.sentiment.is_configured(),
                    cultural_configured = self.cultural.is_configured(),
                    "Serving mock analysis"
                );
                (mock_sentiment(&validated.text), mock_cultural(&validated.text))
            }
            Provenance::Live => self.run_live(validated).await,
        };

        let report = self.synthesizer.synthesize(sentiment, cultural);
        tracing::info!(
            overall_score = report.overall_score,
            risk_level = %report.risk_level,
            sentiment_mode = %report.sentiment.mode,
            cultural_mode = %report.cultural.mode,
            "Analysis complete"
        );

        Ok(report)
    }

    async fn run_live(&self, request: ValidatedRequest) -> (SentimentReport, CulturalReport) {
        let request = Arc::new(request);

        let sentiment_task = {
            let agent = Arc::clone(&self.sentiment);
            let request = Arc::clone(&request);
            tokio::spawn(async move { agent.analyze(&request.text).await })
        };
        let cultural_task = {
            let agent = Arc::clone(&self.cultural);
            let request = Arc::clone(&request);
            tokio::spawn(async move { agent.analyze(&request).await })
        };

        let (sentiment, cultural) = tokio::join!(sentiment_task, cultural_task);

        let sentiment = sentiment.unwrap_or_else(|e| {
            tracing::error!(provider = self.sentiment.provider_name(), error = %e, "Sentiment task aborted");
            mock_sentiment(&request.text)
        });
        let cultural = cultural.unwrap_or_else(|e| {
            tracing::error!(provider = self.cultural.provider_name(), error = %e, "Cultural task aborted");
            mock_cultural(&request.text)
        });

        (sentiment, cultural)
    }
}

/// Builder for [`AnalysisOrchestrator`].
///
/// Providers not set explicitly are created from the configuration.
pub struct OrchestratorBuilder {
    sentiment_provider: Option<Arc<dyn SentimentProvider>>,
    llm_provider: Option<Arc<dyn LlmProvider>>,
    config: RuntimeConfig,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            sentiment_provider: None,
            llm_provider: None,
            config: RuntimeConfig::default(),
        }
    }

    /// Set the sentiment provider.
    pub fn sentiment_provider(mut self, provider: Arc<dyn SentimentProvider>) -> Self {
        self.sentiment_provider = Some(provider);
        self
    }

    /// Set the generative model provider.
    pub fn llm_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.llm_provider = Some(provider);
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the orchestrator.
    pub fn build(self) -> AnalysisOrchestrator {
        let config = self.config;
        let timeout = config.provider_timeout;

        let sentiment_provider: Arc<dyn SentimentProvider> = match self.sentiment_provider {
            Some(provider) => provider,
            None => Arc::new(WatsonClient::from_config(&config.watson).with_timeout(timeout)),
        };
        let llm_provider: Arc<dyn LlmProvider> = match self.llm_provider {
            Some(provider) => provider,
            None => Arc::new(GeminiClient::from_config(&config.gemini)),
        };

        let completion = GenerationConfig {
            model: config.gemini.model.clone(),
            max_tokens: config.gemini.max_tokens,
            temperature: config.gemini.temperature,
            timeout,
        };

        AnalysisOrchestrator {
            sentiment: Arc::new(SentimentAgent::new(sentiment_provider, config.language.clone(), timeout)),
            cultural: Arc::new(CulturalAgent::new(llm_provider, completion)),
            force_mock: config.force_mock,
            synthesizer: Synthesizer::new(),
        }
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{PromptMessage, Completion, ProviderError, TokenUsage};
    use async_trait::async_trait;
    use locai_core::{
        normalize_sentiment, parse_cultural_response, EmotionScores, RiskLevel, SentimentSignal,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone, Copy)]
    enum Behavior {
        Ok,
        Fail,
        Hang,
        Panic,
    }

    struct TestSentiment {
        behavior: Behavior,
        configured: bool,
        calls: AtomicUsize,
    }

    impl TestSentiment {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                configured: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SentimentProvider for TestSentiment {
        async fn analyze(&self, _text: &str, _language: &str) -> Result<SentimentSignal, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Ok => Ok(SentimentSignal {
                    score: 0.2,
                    label: Some("positive".to_string()),
                    emotions: EmotionScores::default(),
                }),
                Behavior::Fail => Err(ProviderError::ApiError {
                    status: 500,
                    message: "boom".to_string(),
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(SentimentSignal::default())
                }
                Behavior::Panic => panic!("sentiment provider exploded"),
            }
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        fn name(&self) -> &str {
            "test-sentiment"
        }
    }

    struct TestLlm {
        behavior: Behavior,
        configured: bool,
        calls: AtomicUsize,
    }

    impl TestLlm {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                configured: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    const CULTURAL_JSON: &str = r#"{"overallScore": 90, "culturalRiskSummary": "Low risk.", "toneSummary": "Friendly.", "topRisks": ["Minor slang"], "improvementIdeas": ["Localize the date format"]}"#;

    #[async_trait]
    impl LlmProvider for TestLlm {
        async fn complete(
            &self,
            _messages: Vec<PromptMessage>,
            _config: &GenerationConfig,
        ) -> Result<Completion, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Ok => Ok(Completion {
                    content: CULTURAL_JSON.to_string(),
                    usage: TokenUsage::default(),
                    model: "test".to_string(),
                    finish_reason: None,
                }),
                Behavior::Fail => Err(ProviderError::RateLimited { retry_after: None }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(ProviderError::HttpError("unreachable".to_string()))
                }
                Behavior::Panic => panic!("llm provider exploded"),
            }
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        fn name(&self) -> &str {
            "test-llm"
        }
    }

    fn orchestrator(
        sentiment: Arc<TestSentiment>,
        llm: Arc<TestLlm>,
        config: RuntimeConfig,
    ) -> AnalysisOrchestrator {
        OrchestratorBuilder::new()
            .sentiment_provider(sentiment)
            .llm_provider(llm)
            .config(config)
            .build()
    }

    #[tokio::test]
    async fn test_both_live() {
        let orch = orchestrator(TestSentiment::new(Behavior::Ok), TestLlm::new(Behavior::Ok), RuntimeConfig::default());
        assert_eq!(orch.mode(), Provenance::Live);

        let report = orch.analyze(&AnalysisRequest::new("Hello world")).await.unwrap();

        // polarity 0.2 -> 60, cultural 90 -> 75
        assert_eq!(report.sentiment.overall_score, 60);
        assert_eq!(report.cultural.overall_score, 90);
        assert_eq!(report.overall_score, 75);
        assert_eq!(report.risk_level, RiskLevel::Medium);
        assert!(!report.is_degraded());
    }

    #[tokio::test]
    async fn test_empty_text_makes_no_calls() {
        let sentiment = TestSentiment::new(Behavior::Ok);
        let llm = TestLlm::new(Behavior::Ok);
        let orch = orchestrator(Arc::clone(&sentiment), Arc::clone(&llm), RuntimeConfig::default());

        let err = orch.analyze(&AnalysisRequest::new("   ")).await.unwrap_err();
        assert_eq!(err, AnalysisError::InvalidInput(ValidationError::EmptyText));
        assert_eq!(sentiment.calls.load(Ordering::SeqCst), 0);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_both_failing_yields_mock_report() {
        let orch = orchestrator(TestSentiment::new(Behavior::Fail), TestLlm::new(Behavior::Fail), RuntimeConfig::default());

        let report = orch.analyze(&AnalysisRequest::new("Hello world")).await.unwrap();
        assert_eq!(report.sentiment, mock_sentiment("Hello world"));
        assert_eq!(report.cultural, mock_cultural("Hello world"));
        assert!(!report.cultural.top_risks.is_empty());
        assert!(!report.cultural.improvement_ideas.is_empty());
    }

    #[tokio::test]
    async fn test_sentiment_failure_keeps_cultural_live() {
        let orch = orchestrator(TestSentiment::new(Behavior::Fail), TestLlm::new(Behavior::Ok), RuntimeConfig::default());

        let report = orch.analyze(&AnalysisRequest::new("Hello world")).await.unwrap();
        assert_eq!(report.sentiment, mock_sentiment("Hello world"));

        let expected = parse_cultural_response(CULTURAL_JSON).unwrap().report;
        assert_eq!(report.cultural, expected);
        assert_eq!(report.cultural.mode, Provenance::Live);
    }

    #[tokio::test]
    async fn test_cultural_failure_keeps_sentiment_live() {
        let orch = orchestrator(TestSentiment::new(Behavior::Ok), TestLlm::new(Behavior::Fail), RuntimeConfig::default());

        let report = orch.analyze(&AnalysisRequest::new("Hello world")).await.unwrap();
        assert_eq!(report.cultural, mock_cultural("Hello world"));

        let expected = normalize_sentiment(&SentimentSignal {
            score: 0.2,
            label: Some("positive".to_string()),
            emotions: EmotionScores::default(),
        });
        assert_eq!(report.sentiment, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out() {
        let config = RuntimeConfig {
            provider_timeout: Duration::from_secs(2),
            ..RuntimeConfig::default()
        };
        let orch = orchestrator(TestSentiment::new(Behavior::Ok), TestLlm::new(Behavior::Hang), config);

        let report = orch.analyze(&AnalysisRequest::new("Hello world")).await.unwrap();
        assert_eq!(report.sentiment.mode, Provenance::Live);
        assert_eq!(report.cultural, mock_cultural("Hello world"));
    }

    #[tokio::test]
    async fn test_panicking_task_replaced_by_mock() {
        let orch = orchestrator(TestSentiment::new(Behavior::Panic), TestLlm::new(Behavior::Ok), RuntimeConfig::default());

        let report = orch.analyze(&AnalysisRequest::new("Hello world")).await.unwrap();
        assert_eq!(report.sentiment, mock_sentiment("Hello world"));
        assert_eq!(report.cultural.mode, Provenance::Live);
    }

    #[tokio::test]
    async fn test_force_mock_skips_providers() {
        let sentiment = TestSentiment::new(Behavior::Ok);
        let llm = TestLlm::new(Behavior::Ok);
        let config = RuntimeConfig {
            force_mock: true,
            ..RuntimeConfig::default()
        };
        let orch = orchestrator(Arc::clone(&sentiment), Arc::clone(&llm), config);

        assert_eq!(orch.mode(), Provenance::Mock);
        let report = orch.analyze(&AnalysisRequest::new("Hello world")).await.unwrap();
        assert!(report.is_degraded());
        assert_eq!(sentiment.calls.load(Ordering::SeqCst), 0);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_provider_means_mock_mode() {
        let sentiment = TestSentiment::new(Behavior::Ok);
        let llm = Arc::new(TestLlm {
            behavior: Behavior::Ok,
            configured: false,
            calls: AtomicUsize::new(0),
        });
        let orch = orchestrator(Arc::clone(&sentiment), llm, RuntimeConfig::default());

        assert_eq!(orch.mode(), Provenance::Mock);
        let report = orch.analyze(&AnalysisRequest::new("Hello world")).await.unwrap();
        assert_eq!(report.sentiment.mode, Provenance::Mock);
        assert_eq!(report.cultural.mode, Provenance::Mock);
        assert_eq!(sentiment.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mock_mode_is_idempotent() {
        let config = RuntimeConfig {
            force_mock: true,
            ..RuntimeConfig::default()
        };
        let orch = orchestrator(TestSentiment::new(Behavior::Ok), TestLlm::new(Behavior::Ok), config);
        let request = AnalysisRequest::new("Limited time only!").with_market("Germany");

        let first = orch.analyze(&request).await.unwrap();
        let second = orch.analyze(&request).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_from_config_without_credentials_is_mock() {
        let mut config = RuntimeConfig::default();
        config.watson.service_url = None;

        let orch = AnalysisOrchestrator::from_config(config);
        assert_eq!(orch.mode(), Provenance::Mock);
    }
}
