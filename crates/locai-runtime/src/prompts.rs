//! Prompts for the cultural and tone-of-voice audit.
//!
//! The system prompt frames the model as an auditor, not a translator. The
//! user prompt carries the market, the audience and the copy itself.

use locai_core::parser::SECTION_DELIMITER;

/// Fences the copy inside the user prompt.
pub const COPY_FENCE: &str = "-----";

/// System prompt shared by every cultural audit.
pub const CULTURAL_SYSTEM_PROMPT: &str = r#"
You are a cultural and tone-of-voice risk auditor for marketing copy.

You ANALYZE the copy. You never translate it and never rewrite it in full.

## What to look for
- Idioms, slang or wordplay that may not land in the target market
- Religious, political or historical references that could offend
- Colour, number, gesture or animal symbolism with local meaning
- Humour, sarcasm or irony that may read as rude
- Over-promising, absolute guarantees or aggressive claims
- Tone that does not fit the audience (too formal, too casual, patronising)

## Scoring
overallScore is 0-100 where HIGHER means SAFER:
- 85-100: ready for the market
- 70-84: minor adjustments recommended
- below 70: significant cultural or tone risk
"#;

/// Output contract appended to every user prompt.
fn output_instructions() -> String {
    format!(
        r#"## Output format
Respond with ONE strict JSON object and nothing else:
{{
  "overallScore": number,
  "culturalRiskSummary": "string",
  "toneSummary": "string",
  "topRisks": ["string"],
  "improvementIdeas": ["string"]
}}

Only if you cannot produce JSON, respond with exactly four plain-text sections
separated by {d} in this order:
cultural risk summary {d} tone summary {d} risk list (one per line) {d} improvement list (one per line)"#,
        d = SECTION_DELIMITER
    )
}

/// Build the user prompt for one audit.
pub fn build_cultural_prompt(text: &str, market: &str, audience: &str) -> String {
    format!(
        "Target market: {market}\nTarget audience: {audience}\n\n{instructions}\n\nCopy to audit:\n{fence}\n{text}\n{fence}",
        instructions = output_instructions(),
        fence = COPY_FENCE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_market_and_audience() {
        let prompt = build_cultural_prompt("Buy now!", "Japan", "retirees");
        assert!(prompt.contains("Target market: Japan"));
        assert!(prompt.contains("Target audience: retirees"));
    }

    #[test]
    fn test_prompt_ends_with_fenced_copy() {
        let prompt = build_cultural_prompt("Buy now!", "Japan", "retirees");
        assert!(prompt.ends_with("-----\nBuy now!\n-----"));
    }

    #[test]
    fn test_prompt_describes_both_output_shapes() {
        let prompt = build_cultural_prompt("x", "m", "a");
        for field in ["overallScore", "culturalRiskSummary", "toneSummary", "topRisks", "improvementIdeas"] {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("|||"));
    }

    #[test]
    fn test_system_prompt_forbids_translation() {
        assert!(CULTURAL_SYSTEM_PROMPT.contains("never translate"));
        assert!(CULTURAL_SYSTEM_PROMPT.contains("HIGHER means SAFER"));
    }
}
