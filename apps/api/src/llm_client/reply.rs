//! Tolerant JSON extraction from free-text model replies.
//!
//! Three outcomes: the whole reply parses (`Strict`), the first-`{`…last-`}`
//! span parses (`Lenient`), or nothing usable was found (`Default`).

use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyParse<T> {
    Strict(T),
    Lenient(T),
    Default,
}

impl<T> ReplyParse<T> {
    /// Returns the parsed value, or `fallback()` when nothing parsed.
    pub fn or_else(self, fallback: impl FnOnce() -> T) -> T {
        match self {
            ReplyParse::Strict(v) | ReplyParse::Lenient(v) => v,
            ReplyParse::Default => fallback(),
        }
    }
}

pub fn parse_reply<T: DeserializeOwned>(text: &str) -> ReplyParse<T> {
    if let Ok(value) = serde_json::from_str::<T>(strip_json_fences(text)) {
        return ReplyParse::Strict(value);
    }
    match brace_span(text).map(serde_json::from_str::<T>) {
        Some(Ok(value)) => ReplyParse::Lenient(value),
        _ => ReplyParse::Default,
    }
}

/// Greedy span from the first `{` to the last `}`.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
