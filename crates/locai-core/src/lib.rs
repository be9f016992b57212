//! # locai-core
//!
//! Deterministic building blocks of the LocAI copy auditor.
//!
//! This crate never performs I/O. It covers:
//! - request validation and the report data model
//! - sentiment normalization (polarity to safety score, diagnostic flags)
//! - lenient parsing of generative-model output
//! - deterministic mock reports for degraded operation
//! - merging sub-reports into a final score and risk tier
//!
//! ## Example
//!
//! ```rust
//! use locai_core::{evaluate_offline, AnalysisRequest, RiskLevel};
//!
//! let request = AnalysisRequest::new("Limited offer: the best phone in town!")
//!     .with_market("Turkey");
//! let report = evaluate_offline(&request).unwrap();
//!
//! assert!(report.is_degraded());
//! assert_eq!(report.risk_level, RiskLevel::from_score(report.overall_score));
//! ```

pub mod fallback;
pub mod parser;
pub mod sentiment;
pub mod synthesizer;
pub mod types;

// Re-export main types at crate root
pub use fallback::{mock_cultural, mock_sentiment, MOCK_PREFIX};
pub use parser::{parse_cultural_response, ParseError, ParseStage, ParsedCultural};
pub use sentiment::normalize_sentiment;
pub use synthesizer::{blend_scores, Synthesizer};
pub use types::{
    AnalysisReport, AnalysisRequest, CulturalReport, EmotionScores, Provenance, RiskLevel,
    SentimentLabel, SentimentReport, SentimentSignal, ValidatedRequest, ValidationError,
    DEFAULT_AUDIENCE, DEFAULT_MARKET,
};

/// Produce a full report without contacting any provider.
///
/// Both sub-reports come from the deterministic fallback generator, so the
/// result is marked degraded.
pub fn evaluate_offline(request: &AnalysisRequest) -> Result<AnalysisReport, ValidationError> {
    let validated = request.validate()?;

    let sentiment = mock_sentiment(&validated.text);
    let cultural = mock_cultural(&validated.text);

    Ok(Synthesizer::new().synthesize(sentiment, cultural))
}
