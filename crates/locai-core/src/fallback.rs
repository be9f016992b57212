//! Deterministic placeholder reports.
//!
//! Used when a provider is not configured, mock mode is forced, or a live
//! call failed. Output depends only on the length of the analyzed text, so
//! identical input always yields identical reports.

use crate::types::{CulturalReport, Provenance, SentimentLabel, SentimentReport};

/// Text length (in characters) at which the length factor saturates.
const LENGTH_SATURATION: f64 = 400.0;

const MOCK_SENTIMENT_POLARITY: f64 = 0.05;

/// Prefix carried by every human-readable mock text.
pub const MOCK_PREFIX: &str = "Mock mode:";

fn length_factor(text: &str) -> f64 {
    (text.trim().chars().count() as f64 / LENGTH_SATURATION).min(1.0)
}

fn mock_score(text: &str, base: i64, spread: f64, min: i64, max: i64) -> u8 {
    let raw = base + (length_factor(text) * spread).round() as i64 - 10;
    raw.clamp(min, max) as u8
}

/// Placeholder sentiment report.
pub fn mock_sentiment(text: &str) -> SentimentReport {
    SentimentReport {
        overall_score: mock_score(text, 60, 20.0, 30, 95),
        sentiment_label: SentimentLabel::Neutral,
        sentiment_score: MOCK_SENTIMENT_POLARITY,
        top_flags: vec![
            format!("{MOCK_PREFIX} sentiment provider is not configured or failed."),
            "Connect IBM Watson NLU credentials (IBM_API_KEY, IBM_API_URL) for real sentiment analysis."
                .to_string(),
        ],
        mode: Provenance::Mock,
    }
}

/// Placeholder cultural report.
pub fn mock_cultural(text: &str) -> CulturalReport {
    CulturalReport {
        overall_score: mock_score(text, 65, 15.0, 35, 96),
        cultural_risk_summary: format!(
            "{MOCK_PREFIX} cultural risk summary is generated locally until the generative provider is configured or recovers."
        ),
        tone_summary: format!(
            "{MOCK_PREFIX} tone-of-voice analysis is simulated. Connect Gemini (GEMINI_API_KEY) for real analysis."
        ),
        top_risks: vec![
            "Potential over-promising language in marketing claims (mock).".to_string(),
            "Some phrases may sound generic and not tailored to the target market (mock).".to_string(),
        ],
        improvement_ideas: vec![
            "Add more market-specific details to sound tailored and credible.".to_string(),
            "Reduce absolute promises and keep benefits realistic.".to_string(),
        ],
        mode: Provenance::Mock,
    }
}
