use std::sync::Arc;
use std::time::Duration;

use locai_core::{mock_sentiment, normalize_sentiment, SentimentReport};

use super::AgentError;
use crate::providers::SentimentProvider;

/// Sentiment half of the analysis.
pub struct SentimentAgent {
    provider: Arc<dyn SentimentProvider>,
    language: String,
    timeout: Duration,
}

impl SentimentAgent {
    pub fn new(provider: Arc<dyn SentimentProvider>, language: impl Into<String>, timeout: Duration) -> Self {
        Self {
            provider,
            language: language.into(),
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Analyze the text, falling back to the mock report on any failure.
    pub async fn analyze(&self, text: &str) -> SentimentReport {
        match self.try_analyze(text).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "Sentiment analysis failed, using mock report"
                );
                mock_sentiment(text)
            }
        }
    }

    /// Single provider call with timeout, no fallback.
    pub async fn try_analyze(&self, text: &str) -> Result<SentimentReport, AgentError> {
        let signal = tokio::time::timeout(self.timeout, self.provider.analyze(text, &self.language))
            .await
            .map_err(|_| AgentError::Timeout(self.timeout))??;

        Ok(normalize_sentiment(&signal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use async_trait::async_trait;
    use locai_core::{EmotionScores, Provenance, SentimentLabel, SentimentSignal};

    struct FixedProvider(SentimentSignal);

    #[async_trait]
    impl SentimentProvider for FixedProvider {
        async fn analyze(&self, _text: &str, language: &str) -> Result<SentimentSignal, ProviderError> {
            assert_eq!(language, "en");
            Ok(self.0.clone())
        }

        fn is_configured(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl SentimentProvider for SlowProvider {
        async fn analyze(&self, _text: &str, _language: &str) -> Result<SentimentSignal, ProviderError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(SentimentSignal::default())
        }

        fn is_configured(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_live_signal_is_normalized() {
        let signal = SentimentSignal {
            score: 0.8,
            label: Some("positive".to_string()),
            emotions: EmotionScores {
                joy: 0.9,
                ..EmotionScores::default()
            },
        };
        let agent = SentimentAgent::new(Arc::new(FixedProvider(signal)), "en", Duration::from_secs(8));

        let report = agent.analyze("Amazing deals!").await;
        assert_eq!(report.mode, Provenance::Live);
        assert_eq!(report.overall_score, 90);
        assert_eq!(report.sentiment_label, SentimentLabel::Positive);
        assert_eq!(report.top_flags.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back_to_mock() {
        let agent = SentimentAgent::new(Arc::new(SlowProvider), "en", Duration::from_secs(8));

        assert!(matches!(
            agent.try_analyze("Hello").await,
            Err(AgentError::Timeout(_))
        ));

        let report = agent.analyze("Hello").await;
        assert_eq!(report, mock_sentiment("Hello"));
    }
}
