//! Shared patterns for model output cleanup.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A response wrapped in a markdown code fence, with optional language tag.
    pub static ref CODE_FENCE: Regex = Regex::new(
        r"(?s)^```[A-Za-z0-9_-]*[ \t]*\r?\n?(?P<body>.*?)\r?\n?```$"
    ).unwrap();

    /// A fenced block anywhere in the text, e.g. after a short preamble.
    pub static ref EMBEDDED_FENCE: Regex = Regex::new(
        r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n(?P<body>.*?)```"
    ).unwrap();

    /// Leading list markers: "-", "*", "•", "+", "1.", "2)".
    pub static ref BULLET_MARKER: Regex = Regex::new(
        r"^\s*(?:[-*•+]|\d{1,2}[.)])\s*"
    ).unwrap();

    /// Section labels a model may echo at the start of a delimited segment.
    pub static ref SECTION_LABEL: Regex = Regex::new(
        r"(?i)^\s*(?:\d[.)]\s*)?(?:cultural[ _-]risk[ _-]summary|cultural[ _-]summary|tone[ _-]of[ _-]voice[ _-]summary|tone[ _-]summary|top[ _-]risks|risks|improvement[ _-]ideas|improvements)\s*:\s*"
    ).unwrap();
}

/// Remove a surrounding markdown code fence, if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match CODE_FENCE.captures(trimmed).and_then(|c| c.name("body")) {
        Some(body) => body.as_str().trim(),
        None => trimmed,
    }
}

/// Body of the first fenced block found anywhere in the text.
pub fn find_fenced_block(raw: &str) -> Option<&str> {
    EMBEDDED_FENCE
        .captures(raw)
        .and_then(|c| c.name("body"))
        .map(|body| body.as_str().trim())
}

/// Span from the first `{` to the last `}`, inclusive.
pub fn find_brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Remove a leading bullet marker from a list line.
pub fn strip_bullet(line: &str) -> &str {
    match BULLET_MARKER.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line.trim(),
    }
}

/// Remove an echoed section label from a segment.
pub fn strip_section_label(segment: &str) -> &str {
    match SECTION_LABEL.find(segment) {
        Some(m) => segment[m.end()..].trim(),
        None => segment.trim(),
    }
}
