//! Stage 1: strict JSON object.

use serde_json::{Map, Value};

use super::patterns::{find_brace_span, find_fenced_block, strip_code_fence};
use super::{
    estimate_score, or_default_entry, DEFAULT_CULTURAL_SUMMARY, DEFAULT_IMPROVEMENT,
    DEFAULT_RISK, DEFAULT_TONE_SUMMARY,
};
use crate::types::{CulturalReport, Provenance};

/// Parse a response that is a single JSON object.
///
/// The object may be bare, fenced, or follow a short preamble. Returns the
/// report and whether its score was estimated, or `None` when no JSON object
/// can be found.
pub fn parse_structured(raw: &str) -> Option<(CulturalReport, bool)> {
    let fields = extract_object(raw)?;
    let object = &fields;

    let (overall_score, score_estimated) = match score_field(object, "overallScore") {
        Some(score) => (score, false),
        None => (estimate_score(raw), true),
    };

    let report = CulturalReport {
        overall_score,
        cultural_risk_summary: string_field(object, "culturalRiskSummary", DEFAULT_CULTURAL_SUMMARY),
        tone_summary: string_field(object, "toneSummary", DEFAULT_TONE_SUMMARY),
        top_risks: list_field(object, "topRisks", DEFAULT_RISK),
        improvement_ideas: list_field(object, "improvementIdeas", DEFAULT_IMPROVEMENT),
        mode: Provenance::Live,
    };

    Some((report, score_estimated))
}

/// Keys of the report object; an object embedded in prose must carry one.
const REPORT_KEYS: [&str; 5] = [
    "overallScore",
    "culturalRiskSummary",
    "toneSummary",
    "topRisks",
    "improvementIdeas",
];

/// Try the whole response, then an embedded fenced block, then the outermost braces.
fn extract_object(raw: &str) -> Option<Map<String, Value>> {
    if let Some(object) = parse_object(strip_code_fence(raw)) {
        return Some(object);
    }

    [find_fenced_block(raw), find_brace_span(raw)]
        .into_iter()
        .flatten()
        .filter_map(parse_object)
        .find(|object| REPORT_KEYS.iter().any(|key| object.contains_key(*key)))
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(candidate) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn score_field(object: &Map<String, Value>, key: &str) -> Option<u8> {
    object
        .get(key)
        .and_then(Value::as_f64)
        .filter(|score| score.is_finite())
        .map(|score| score.round().clamp(0.0, 100.0) as u8)
}

fn string_field(object: &Map<String, Value>, key: &str, default: &str) -> String {
    match object.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

fn list_field(object: &Map<String, Value>, key: &str, default: &str) -> Vec<String> {
    let items = match object.get(key).and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        None => Vec::new(),
    };

    or_default_entry(items, default)
}
