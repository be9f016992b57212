//! Sentiment normalization.
//!
//! Turns a raw [`SentimentSignal`] into a [`SentimentReport`]: the polarity is
//! rescaled to a 0-100 safety score and diagnostic flags are derived from
//! polarity and emotion intensities.

use crate::types::{Provenance, SentimentLabel, SentimentReport, SentimentSignal};

/// Polarity above which copy reads as over-enthusiastic.
pub const ENTHUSIASM_THRESHOLD: f64 = 0.6;

/// Polarity below which copy reads as negative.
pub const NEGATIVITY_THRESHOLD: f64 = -0.4;

/// Joy intensity above which credibility is questioned.
pub const JOY_THRESHOLD: f64 = 0.7;

/// Anger intensity above which tone needs review.
pub const ANGER_THRESHOLD: f64 = 0.4;

/// Polarity band treated as neutral when the provider gives no usable label.
const NEUTRAL_BAND: f64 = 0.05;

pub const FLAG_ENTHUSIASTIC: &str =
    "Copy sounds very enthusiastic. Check for over-promising claims.";
pub const FLAG_NEGATIVE: &str =
    "Copy feels quite negative. This might not be ideal for marketing.";
pub const FLAG_JOY: &str =
    "Very high joy emotion detected; ensure it still sounds credible.";
pub const FLAG_ANGER: &str = "Noticeable anger detected; review tone carefully.";
pub const FLAG_NO_ISSUES: &str = "No major sentiment issues detected.";

/// Clamp polarity into [-1, 1]. Non-finite values count as neutral.
pub fn clamp_polarity(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Map polarity in [-1, 1] onto a 0-100 safety score.
pub fn polarity_to_score(score: f64) -> u8 {
    let clamped = clamp_polarity(score);
    ((clamped + 1.0) / 2.0 * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Normalize a live provider signal.
pub fn normalize_sentiment(signal: &SentimentSignal) -> SentimentReport {
    let polarity = clamp_polarity(signal.score);

    let sentiment_label = signal
        .label
        .as_deref()
        .and_then(SentimentLabel::parse)
        .unwrap_or_else(|| label_from_polarity(polarity));

    SentimentReport {
        overall_score: polarity_to_score(polarity),
        sentiment_label,
        sentiment_score: polarity,
        top_flags: derive_flags(polarity, signal),
        mode: Provenance::Live,
    }
}

fn label_from_polarity(polarity: f64) -> SentimentLabel {
    if polarity > NEUTRAL_BAND {
        SentimentLabel::Positive
    } else if polarity < -NEUTRAL_BAND {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

fn derive_flags(polarity: f64, signal: &SentimentSignal) -> Vec<String> {
    let mut flags = Vec::new();

    if polarity > ENTHUSIASM_THRESHOLD {
        flags.push(FLAG_ENTHUSIASTIC.to_string());
    }
    if polarity < NEGATIVITY_THRESHOLD {
        flags.push(FLAG_NEGATIVE.to_string());
    }
    if signal.emotions.joy > JOY_THRESHOLD {
        flags.push(FLAG_JOY.to_string());
    }
    if signal.emotions.anger > ANGER_THRESHOLD {
        flags.push(FLAG_ANGER.to_string());
    }

    if flags.is_empty() {
        flags.push(FLAG_NO_ISSUES.to_string());
    }

    flags
}
