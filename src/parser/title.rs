use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::intent::TRIGGER_RE;
use crate::task::TaskCategory;

/// Trailing time expression, including the "a la(s)" connective that
/// usually introduces it ("... a las 9pm"). Stripping only the bare
/// digits would leave the connective dangling at the end of the title.
static TIME_TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*(?:a\s+las?\s+)?\d{1,2}(?:[:.\s]?\d{2})?\s*(?:am|pm|a\.m\.|p\.m\.)?\s*$")
        .expect("time tail regex is valid")
});

/// Extract the task title: everything after the first trigger phrase in
/// the original-case transcript, minus a trailing time expression. Falls
/// back to the category's canned title when nothing usable remains, so
/// the caller never sees an empty title.
pub fn extract_title(transcript: &str, category: TaskCategory) -> String {
    let title = TRIGGER_RE
        .find(transcript)
        .map(|m| strip_time_tail(transcript[m.end()..].trim()))
        .unwrap_or_default();

    if title.is_empty() {
        category.default_title().to_string()
    } else {
        title
    }
}

fn strip_time_tail(remainder: &str) -> String {
    TIME_TAIL_RE.replace(remainder, "").trim().to_string()
}
