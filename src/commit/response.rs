//! Extraction of numbered candidates from a free-text model reply.

use std::sync::LazyLock;

use regex_lite::Regex;

static NUMBERED_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+").unwrap());

/// Pull the candidates out of a model reply.
///
/// Every line of the form `N. text` contributes `text`. When no line is
/// numbered, a non-blank reply is returned whole as a single candidate.
pub fn parse_suggestions(reply: &str) -> Vec<String> {
    let mut suggestions = Vec::new();
    let mut matched = false;

    for line in reply.lines().map(str::trim) {
        if let Some(prefix) = NUMBERED_PREFIX.find(line) {
            matched = true;
            let text = line[prefix.end()..].trim();
            if !text.is_empty() {
                suggestions.push(text.to_string());
            }
        }
    }

    if !matched && !reply.trim().is_empty() {
        suggestions.push(reply.trim().to_string());
    }

    suggestions
}
