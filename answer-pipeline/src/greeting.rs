use std::sync::OnceLock;

use regex::Regex;

/// Questions with more words than this are never treated as greetings.
const MAX_GREETING_WORDS: usize = 5;

const GREETING_PATTERNS: &[&str] = &[
    r"\b(hi|hello|hey|greetings|good\s+(morning|afternoon|evening)|howdy)\b",
    r"\bhow\s+are\s+you\b",
    r"\bwhat'?s\s+up\b",
    r"\bnice\s+to\s+meet\b",
    r"\bpleasure\s+to\s+meet\b",
];

/// Canned reply for conversational openers; served without contacting the
/// completion endpoint.
pub const GREETING_RESPONSE: &str = "Hello! 👋 I'm your document assistant. I'm here to help you analyze and understand your uploaded documents.

You can ask me questions about:
- Specific information in your documents
- Summaries of content
- Analysis and insights
- Any clarifications you need

Just ask your question, and I'll do my best to help based on the document content!";

fn greeting_patterns() -> Option<&'static Vec<Regex>> {
    static PATTERNS: OnceLock<Option<Vec<Regex>>> = OnceLock::new();

    PATTERNS
        .get_or_init(|| {
            GREETING_PATTERNS
                .iter()
                .map(|pattern| Regex::new(pattern).ok())
                .collect()
        })
        .as_ref()
}

/// Stateless greeting classifier: true when the text, lower-cased and
/// trimmed, is at most five words and matches one of the fixed patterns.
pub fn is_greeting(text: &str) -> bool {
    let lowered = text.to_lowercase();
    let trimmed = lowered.trim();

    if trimmed.split_whitespace().count() > MAX_GREETING_WORDS {
        return false;
    }

    greeting_patterns()
        .map(|patterns| patterns.iter().any(|pattern| pattern.is_match(trimmed)))
        .unwrap_or(false)
}
