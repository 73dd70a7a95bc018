use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

/// Compiled pattern set for response cleaning, initialized once per process.
struct CleanPatterns {
    /// Zero-width characters, C0 controls and DEL.
    control: Regex,
    /// Literal `\xHH` sequences that leaked through as text.
    hex_escape: Regex,
    /// Literal `\uHHHH` sequences.
    unicode_escape: Regex,
    /// Literal `\r`, `\n`, `\t` sequences.
    whitespace_escape: Regex,
    /// HTML tags.
    html_tag: Regex,
    /// Markdown code fence openers at line start.
    fence_open: Regex,
    /// Markdown code fence closers at line end.
    fence_close: Regex,
    /// Runs of spaces inside a line.
    spaces: Regex,
    /// Three or more consecutive newlines.
    blank_runs: Regex,
}

impl CleanPatterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            control: Regex::new(
                r"[\x{200B}-\x{200D}\x{FEFF}\x00-\x08\x0B\x0C\x0E-\x1F\x7F]",
            )?,
            hex_escape: Regex::new(r"\\x[0-9a-fA-F]{2}")?,
            unicode_escape: Regex::new(r"\\u[0-9a-fA-F]{4}")?,
            whitespace_escape: Regex::new(r"\\[rnt]")?,
            html_tag: Regex::new(r"<[^>]+>")?,
            fence_open: Regex::new(r"(?m)^```\w*\n?")?,
            fence_close: Regex::new(r"(?m)\n?```$")?,
            spaces: Regex::new(r" +")?,
            blank_runs: Regex::new(r"\n{3,}")?,
        })
    }
}

fn patterns() -> Option<&'static CleanPatterns> {
    static PATTERNS: OnceLock<Result<CleanPatterns, String>> = OnceLock::new();

    match PATTERNS.get_or_init(|| CleanPatterns::compile().map_err(|err| err.to_string())) {
        Ok(patterns) => Some(patterns),
        Err(err) => {
            warn!(error = %err, "Response clean patterns failed to compile");
            None
        }
    }
}

/// Cleans a model response: strips control characters, leaked escape
/// sequences, HTML tags and stray code fences, normalizes intra-line
/// whitespace while preserving blank lines, and collapses runs of blank
/// lines. Cleaning never fails; if the pattern set is unavailable the
/// trimmed raw text is returned instead.
pub fn clean_response(content: &str) -> String {
    match patterns() {
        Some(patterns) => clean_with(patterns, content),
        None => content.trim().to_string(),
    }
}

fn clean_with(patterns: &CleanPatterns, content: &str) -> String {
    let cleaned = patterns.control.replace_all(content, "");
    let cleaned = patterns.hex_escape.replace_all(&cleaned, "");
    let cleaned = patterns.unicode_escape.replace_all(&cleaned, "");
    let cleaned = patterns.whitespace_escape.replace_all(&cleaned, "");
    let cleaned = patterns.html_tag.replace_all(&cleaned, "");
    let cleaned = patterns.fence_open.replace_all(&cleaned, "");
    let cleaned = patterns.fence_close.replace_all(&cleaned, "");

    // Collapse spacing per line; blank lines stay blank so intentional
    // paragraph breaks survive.
    let lines: Vec<String> = cleaned
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                String::new()
            } else {
                patterns.spaces.replace_all(trimmed, " ").into_owned()
            }
        })
        .collect();

    let joined = lines.join("\n");
    let collapsed = patterns.blank_runs.replace_all(&joined, "\n\n");

    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_leaked_escape_sequences_and_whitespace() {
        assert_eq!(
            clean_response("  Revenue was \\n$5M.  "),
            "Revenue was $5M."
        );
    }

    #[test]
    fn test_strips_hex_and_unicode_escapes() {
        assert_eq!(clean_response("total\\x1b is \\u00e9 fine"), "total is fine");
    }

    #[test]
    fn test_strips_control_and_zero_width_characters() {
        let input = "be\u{200B}fore\u{0007} after\u{FEFF}";
        assert_eq!(clean_response(input), "before after");
    }

    #[test]
    fn test_strips_html_tags() {
        assert_eq!(
            clean_response("<p>The answer is <b>42</b>.</p>"),
            "The answer is 42."
        );
    }

    #[test]
    fn test_strips_code_fences() {
        assert_eq!(clean_response("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_collapses_spaces_but_keeps_blank_lines() {
        let input = "first   line\n\nsecond    line";
        assert_eq!(clean_response(input), "first line\n\nsecond line");
    }

    #[test]
    fn test_collapses_runs_of_blank_lines() {
        let input = "paragraph one\n\n\n\n\nparagraph two";
        assert_eq!(clean_response(input), "paragraph one\n\nparagraph two");
    }

    #[test]
    fn test_plain_text_is_untouched_apart_from_trim() {
        assert_eq!(clean_response("  already clean  "), "already clean");
        assert_eq!(clean_response(""), "");
    }
}
