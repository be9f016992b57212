//! Synthesizer: merges the two sub-reports into the final report.
//!
//! The blended score is the rounded mean of both sub-scores and the risk
//! tier is derived from it. Sub-reports are carried through unchanged,
//! including their provenance.

use crate::types::{AnalysisReport, CulturalReport, RiskLevel, SentimentReport};

/// Rounded mean of two 0-100 scores, half rounding up.
pub fn blend_scores(sentiment: u8, cultural: u8) -> u8 {
    ((u16::from(sentiment) + u16::from(cultural) + 1) / 2) as u8
}

/// The Synthesizer combines sentiment and cultural analyses.
#[derive(Debug, Default, Clone, Copy)]
pub struct Synthesizer;

impl Synthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Merge both sub-reports into an [`AnalysisReport`].
    pub fn synthesize(&self, sentiment: SentimentReport, cultural: CulturalReport) -> AnalysisReport {
        let overall_score = blend_scores(sentiment.overall_score, cultural.overall_score);
        let risk_level = RiskLevel::from_score(overall_score);

        tracing::debug!(
            sentiment_score = sentiment.overall_score,
            cultural_score = cultural.overall_score,
            overall_score,
            risk_level = %risk_level,
            "Synthesized report"
        );

        AnalysisReport {
            overall_score,
            risk_level,
            sentiment,
            cultural,
        }
    }
}
