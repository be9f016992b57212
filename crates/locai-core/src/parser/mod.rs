//! Lenient parsing of generative-model output into a [`CulturalReport`].
//!
//! Two stages, tried in order:
//! 1. [`structured`]: the whole response (optionally inside a markdown code
//!    fence) is a single JSON object.
//! 2. [`delimited`]: four plain-text sections separated by
//!    [`SECTION_DELIMITER`].
//!
//! Fields that are missing or mistyped get descriptive defaults; lists are
//! never empty. A response that fits neither stage is a [`ParseError`] and the
//! caller is expected to fall back to the mock report.

mod delimited;
mod patterns;
mod structured;

use thiserror::Error;

use crate::types::CulturalReport;

pub use delimited::parse_delimited;
pub use structured::parse_structured;

/// Separator between the four plain-text sections.
pub const SECTION_DELIMITER: &str = "|||";

pub const DEFAULT_CULTURAL_SUMMARY: &str = "No cultural summary provided by the model.";
pub const DEFAULT_TONE_SUMMARY: &str = "No tone summary provided by the model.";
pub const DEFAULT_RISK: &str = "No explicit risks listed by the model.";
pub const DEFAULT_IMPROVEMENT: &str = "No improvement suggestions listed by the model.";

/// Score floor of the length heuristic.
pub const ESTIMATED_SCORE_FLOOR: u8 = 40;

/// Score ceiling of the length heuristic.
pub const ESTIMATED_SCORE_CEILING: u8 = 90;

/// Response length (in characters) at which the heuristic saturates.
const ESTIMATE_SATURATION: f64 = 1500.0;

/// Errors from cultural response parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Model response is empty")]
    Empty,

    #[error("Model response is neither a JSON object nor delimited sections")]
    Unstructured,
}

/// Which stage produced the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Structured,
    Delimited,
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCultural {
    pub report: CulturalReport,
    pub stage: ParseStage,
    /// True when `overall_score` came from [`estimate_score`]
    pub score_estimated: bool,
}

/// Parse a raw model response.
pub fn parse_cultural_response(raw: &str) -> Result<ParsedCultural, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    if let Some((report, score_estimated)) = parse_structured(trimmed) {
        return Ok(ParsedCultural {
            report,
            stage: ParseStage::Structured,
            score_estimated,
        });
    }

    if let Some(report) = parse_delimited(trimmed) {
        return Ok(ParsedCultural {
            report,
            stage: ParseStage::Delimited,
            score_estimated: true,
        });
    }

    Err(ParseError::Unstructured)
}

/// Approximate a safety score from response length.
///
/// This is a coarse proxy used only when the model omits a score: richer
/// responses drift toward [`ESTIMATED_SCORE_CEILING`], nothing goes below
/// [`ESTIMATED_SCORE_FLOOR`]. It says nothing about the copy's quality.
pub fn estimate_score(response: &str) -> u8 {
    let factor = (response.trim().chars().count() as f64 / ESTIMATE_SATURATION).min(1.0);
    let span = f64::from(ESTIMATED_SCORE_CEILING - ESTIMATED_SCORE_FLOOR);
    ESTIMATED_SCORE_FLOOR + (factor * span).round() as u8
}

/// Ensure a list is never empty.
fn or_default_entry(items: Vec<String>, default: &str) -> Vec<String> {
    if items.is_empty() {
        vec![default.to_string()]
    } else {
        items
    }
}
