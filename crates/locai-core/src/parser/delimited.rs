//! Stage 2: plain-text sections separated by [`SECTION_DELIMITER`].
//!
//! Section order is fixed: cultural risk summary, tone summary, risks,
//! improvement ideas.

use super::patterns::{strip_bullet, strip_section_label};
use super::{
    estimate_score, or_default_entry, DEFAULT_CULTURAL_SUMMARY, DEFAULT_IMPROVEMENT,
    DEFAULT_RISK, DEFAULT_TONE_SUMMARY, SECTION_DELIMITER,
};
use crate::types::{CulturalReport, Provenance};

/// Number of sections the model is asked to produce.
pub const SECTION_COUNT: usize = 4;

/// List lines shorter than this (in characters) are treated as noise.
pub const MIN_LIST_ITEM_CHARS: usize = 5;

/// Parse a delimited response. Returns `None` if the delimiter never appears.
pub fn parse_delimited(raw: &str) -> Option<CulturalReport> {
    if !raw.contains(SECTION_DELIMITER) {
        return None;
    }

    let body = raw
        .trim()
        .trim_start_matches(SECTION_DELIMITER)
        .trim_end_matches(SECTION_DELIMITER);

    let mut sections: Vec<&str> = body
        .split(SECTION_DELIMITER)
        .take(SECTION_COUNT)
        .map(strip_section_label)
        .collect();
    sections.resize(SECTION_COUNT, "");

    Some(CulturalReport {
        overall_score: estimate_score(raw),
        cultural_risk_summary: text_section(sections[0], DEFAULT_CULTURAL_SUMMARY),
        tone_summary: text_section(sections[1], DEFAULT_TONE_SUMMARY),
        top_risks: list_section(sections[2], DEFAULT_RISK),
        improvement_ideas: list_section(sections[3], DEFAULT_IMPROVEMENT),
        mode: Provenance::Live,
    })
}

fn text_section(section: &str, default: &str) -> String {
    if section.is_empty() {
        default.to_string()
    } else {
        section.to_string()
    }
}

fn list_section(section: &str, default: &str) -> Vec<String> {
    let items = section
        .lines()
        .map(strip_bullet)
        .filter(|line| line.chars().count() >= MIN_LIST_ITEM_CHARS)
        .map(str::to_string)
        .collect();

    or_default_entry(items, default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_sections_extracted() {
        let raw = "CULTURAL RISK SUMMARY: Mentions of alcohol may be sensitive.\n|||\n\
                   TONE SUMMARY: Playful and informal.\n|||\n\
                   TOP RISKS:\n- Alcohol imagery in a conservative market\n- Slang may not translate\n|||\n\
                   IMPROVEMENT IDEAS:\n1. Swap the beer visual for coffee\n2. Use plainer wording";

        let report = parse_delimited(raw).unwrap();

        assert_eq!(report.cultural_risk_summary, "Mentions of alcohol may be sensitive.");
        assert_eq!(report.tone_summary, "Playful and informal.");
        assert_eq!(
            report.top_risks,
            vec!["Alcohol imagery in a conservative market", "Slang may not translate"]
        );
        assert_eq!(
            report.improvement_ideas,
            vec!["Swap the beer visual for coffee", "Use plainer wording"]
        );
        assert_eq!(report.mode, Provenance::Live);
    }

    #[test]
    fn test_missing_sections_get_defaults() {
        let report = parse_delimited("Only a summary|||Tone only").unwrap();

        assert_eq!(report.cultural_risk_summary, "Only a summary");
        assert_eq!(report.tone_summary, "Tone only");
        assert_eq!(report.top_risks, vec![DEFAULT_RISK]);
        assert_eq!(report.improvement_ideas, vec![DEFAULT_IMPROVEMENT]);
    }

    #[test]
    fn test_short_lines_are_noise() {
        let report = parse_delimited("s|||t|||- ok\n- Real risk here\n-\n|||- no").unwrap();

        assert_eq!(report.top_risks, vec!["Real risk here"]);
        assert_eq!(report.improvement_ideas, vec![DEFAULT_IMPROVEMENT]);
    }

    #[test]
    fn test_leading_delimiter_does_not_shift_sections() {
        let report = parse_delimited("|||Summary|||Tone|||- Risk one|||- Idea one|||").unwrap();

        assert_eq!(report.cultural_risk_summary, "Summary");
        assert_eq!(report.tone_summary, "Tone");
        assert_eq!(report.top_risks, vec!["Risk one"]);
        assert_eq!(report.improvement_ideas, vec!["Idea one"]);
    }

    #[test]
    fn test_no_delimiter_is_rejected() {
        assert!(parse_delimited("Just some prose from the model.").is_none());
    }

    #[test]
    fn test_score_is_estimated_within_bounds() {
        let report = parse_delimited("a|||b|||c|||d").unwrap();
        assert!((40..=90).contains(&report.overall_score));
    }
}
