//! Request and report types shared by every LocAI component.
//!
//! All report types serialize with camelCase keys, which is the contract the
//! rendering layer consumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Market used when the caller does not name one.
pub const DEFAULT_MARKET: &str = "global";

/// Audience used when the caller does not name one.
pub const DEFAULT_AUDIENCE: &str = "general";

/// Errors raised while validating an incoming request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Text cannot be empty.")]
    EmptyText,
}

/// A copy audit request as submitted by a caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// The copy to audit
    pub text: String,

    /// Target market (e.g. "Turkey", "DACH")
    #[serde(default)]
    pub market: Option<String>,

    /// Target audience (e.g. "gen-z gamers")
    #[serde(default)]
    pub audience: Option<String>,
}

impl AnalysisRequest {
    /// Create a request for the given text with default market and audience.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            market: None,
            audience: None,
        }
    }

    /// Set the target market.
    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    /// Set the target audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Trim the text and apply defaults.
    ///
    /// Fails when the text is empty after trimming. Blank market or audience
    /// values are treated as absent.
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }

        Ok(ValidatedRequest {
            text: text.to_string(),
            market: non_blank_or(self.market.as_deref(), DEFAULT_MARKET),
            audience: non_blank_or(self.audience.as_deref(), DEFAULT_AUDIENCE),
        })
    }
}

fn non_blank_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// A request that passed validation. The text is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub text: String,
    pub market: String,
    pub audience: String,
}

/// Whether a sub-report came from a live provider call or the fallback generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Mock,
}

impl Provenance {
    pub fn is_mock(&self) -> bool {
        matches!(self, Provenance::Mock)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Live => write!(f, "live"),
            Provenance::Mock => write!(f, "mock"),
        }
    }
}

/// Document-level sentiment polarity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Parse a provider label. Unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(SentimentLabel::Positive),
            "neutral" => Some(SentimentLabel::Neutral),
            "negative" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }
}

/// Categorical risk tier derived from the blended score.
///
/// Higher scores are safer, so they map to lower risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Lowest score that still counts as low risk.
    pub const LOW_THRESHOLD: u8 = 85;

    /// Lowest score that still counts as medium risk.
    pub const MEDIUM_THRESHOLD: u8 = 70;

    /// Map a 0-100 score onto a risk tier.
    pub fn from_score(score: u8) -> Self {
        if score >= Self::LOW_THRESHOLD {
            RiskLevel::Low
        } else if score >= Self::MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Per-emotion intensities reported by a sentiment provider, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionScores {
    #[serde(default)]
    pub joy: f64,
    #[serde(default)]
    pub anger: f64,
    #[serde(default)]
    pub sadness: f64,
    #[serde(default)]
    pub fear: f64,
    #[serde(default)]
    pub disgust: f64,
}

/// Raw, provider-agnostic output of a sentiment call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SentimentSignal {
    /// Raw polarity, nominally in [-1, 1]
    pub score: f64,

    /// Provider label, if any
    pub label: Option<String>,

    /// Emotion intensities
    pub emotions: EmotionScores,
}

/// Normalized sentiment analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReport {
    /// 0-100, higher is safer
    pub overall_score: u8,

    pub sentiment_label: SentimentLabel,

    /// Raw polarity in [-1, 1]
    pub sentiment_score: f64,

    /// Diagnostic flags, never empty
    pub top_flags: Vec<String>,

    pub mode: Provenance,
}

/// Normalized cultural and tone-of-voice analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalReport {
    /// 0-100, higher is safer
    pub overall_score: u8,

    pub cultural_risk_summary: String,

    pub tone_summary: String,

    /// Never empty
    pub top_risks: Vec<String>,

    /// Never empty
    pub improvement_ideas: Vec<String>,

    pub mode: Provenance,
}

/// The merged report returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Rounded mean of both sub-scores
    pub overall_score: u8,

    pub risk_level: RiskLevel,

    pub sentiment: SentimentReport,

    pub cultural: CulturalReport,
}

impl AnalysisReport {
    /// True when at least one sub-report came from the fallback generator.
    pub fn is_degraded(&self) -> bool {
        self.sentiment.mode.is_mock() || self.cultural.mode.is_mock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_and_defaults() {
        let request = AnalysisRequest::new("  Buy now!  ");
        let validated = request.validate().unwrap();

        assert_eq!(validated.text, "Buy now!");
        assert_eq!(validated.market, DEFAULT_MARKET);
        assert_eq!(validated.audience, DEFAULT_AUDIENCE);
    }

    #[test]
    fn test_validate_keeps_market_and_audience() {
        let request = AnalysisRequest::new("Hello")
            .with_market("Turkey")
            .with_audience("students");
        let validated = request.validate().unwrap();

        assert_eq!(validated.market, "Turkey");
        assert_eq!(validated.audience, "students");
    }

    #[test]
    fn test_blank_market_falls_back() {
        let request = AnalysisRequest::new("Hello").with_market("   ");
        assert_eq!(request.validate().unwrap().market, DEFAULT_MARKET);
    }

    #[test]
    fn test_whitespace_text_rejected() {
        assert_eq!(
            AnalysisRequest::new(" \n\t ").validate(),
            Err(ValidationError::EmptyText)
        );
        assert_eq!(
            AnalysisRequest::new("").validate(),
            Err(ValidationError::EmptyText)
        );
    }

    #[test]
    fn test_risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(85), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(84), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::High);
    }

    #[test]
    fn test_sentiment_label_parse() {
        assert_eq!(SentimentLabel::parse("Positive"), Some(SentimentLabel::Positive));
        assert_eq!(SentimentLabel::parse(" negative "), Some(SentimentLabel::Negative));
        assert_eq!(SentimentLabel::parse("mixed"), None);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = CulturalReport {
            overall_score: 80,
            cultural_risk_summary: "ok".to_string(),
            tone_summary: "calm".to_string(),
            top_risks: vec!["none".to_string()],
            improvement_ideas: vec!["none".to_string()],
            mode: Provenance::Live,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["overallScore"], 80);
        assert_eq!(json["culturalRiskSummary"], "ok");
        assert_eq!(json["mode"], "live");
    }
}
