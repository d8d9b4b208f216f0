//! PatternMatcher - one compiled rule scanned over one string
//!
//! The scan position is a local of `scan()`; `Regex` holds no cursor, so one
//! matcher can be shared across any number of strings and threads.

use regex::Regex;
use unicode_segmentation::GraphemeCursor;

use super::error::ConfigurationError;
use super::rule::Rule;

// =============================================================================
// Types
// =============================================================================

/// A match in the coordinates of the scanned string (byte offsets)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    pub tag: String,
}

impl MatchSpan {
    pub fn as_str<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

// =============================================================================
// PatternMatcher
// =============================================================================

/// Compiled, immutable matcher for a single rule
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    tag: String,
    regex: Regex,
}

impl PatternMatcher {
    /// Validate and compile a rule
    pub fn compile(tag: &str, rule: &Rule) -> Result<Self, ConfigurationError> {
        let source = rule.to_regex_source(tag)?;
        let regex = Regex::new(&source).map_err(|e| ConfigurationError::InvalidRegex {
            rule: tag.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            tag: tag.to_string(),
            regex,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Find every non-overlapping match, leftmost first.
    ///
    /// A match ending inside a grapheme cluster is cut back to the cluster's
    /// start; one starting inside a cluster is dropped. Either way the scan
    /// resumes at the end of the regex match, so every byte is scanned once.
    /// Empty matches are skipped by advancing one character.
    pub fn scan(&self, text: &str) -> Vec<MatchSpan> {
        let mut spans = Vec::new();
        let mut pos = 0;

        while pos <= text.len() {
            let m = match self.regex.find_at(text, pos) {
                Some(m) => m,
                None => break,
            };

            if m.start() == m.end() {
                match text[m.start()..].chars().next() {
                    Some(c) => pos = m.start() + c.len_utf8(),
                    None => break,
                }
                continue;
            }

            pos = m.end();
            if !is_grapheme_boundary(text, m.start()) {
                continue;
            }

            let end = floor_grapheme_boundary(text, m.end());
            if end > m.start() {
                spans.push(MatchSpan {
                    start: m.start(),
                    end,
                    tag: self.tag.clone(),
                });
            }
        }

        spans
    }
}

fn is_grapheme_boundary(text: &str, offset: usize) -> bool {
    let mut cursor = GraphemeCursor::new(offset, text.len(), true);
    cursor.is_boundary(text, 0).unwrap_or(true)
}

/// Nearest grapheme boundary at or before `offset`
fn floor_grapheme_boundary(text: &str, offset: usize) -> usize {
    if is_grapheme_boundary(text, offset) {
        return offset;
    }
    let mut cursor = GraphemeCursor::new(offset, text.len(), true);
    cursor.prev_boundary(text, 0).ok().flatten().unwrap_or(0)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(spans: &[MatchSpan]) -> Vec<(usize, usize)> {
        spans.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_word_inside_sentence() {
        let m = PatternMatcher::compile("bold", &Rule::words(["ASAP"])).unwrap();
        let text = "Do it ASAP.";
        let spans = m.scan(text);
        assert_eq!(ranges(&spans), vec![(6, 10)]);
        assert_eq!(spans[0].as_str(text), "ASAP");
        assert_eq!(spans[0].tag, "bold");
    }

    #[test]
    fn test_word_not_inside_longer_word() {
        let m = PatternMatcher::compile("bold", &Rule::words(["ASAP"])).unwrap();
        assert!(m.scan("ASAPing").is_empty());
        assert_eq!(ranges(&m.scan("ASAPing ASAP")), vec![(8, 12)]);
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let m = PatternMatcher::compile("bold", &Rule::words(["important"])).unwrap();
        assert_eq!(ranges(&m.scan("This is IMPORTANT and Important")), vec![(8, 17), (22, 31)]);
    }

    #[test]
    fn test_case_sensitive() {
        let m = PatternMatcher::compile("bold", &Rule::words_case_sensitive(["ASAP"])).unwrap();
        assert_eq!(ranges(&m.scan("asap ASAP")), vec![(5, 9)]);
    }

    #[test]
    fn test_unicode_case_folding() {
        let m = PatternMatcher::compile("bold", &Rule::words(["été"])).unwrap();
        let text = "Cet ÉTÉ là";
        let spans = m.scan(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].as_str(text), "ÉTÉ");
    }

    #[test]
    fn test_shorter_word_when_longer_fails_boundary() {
        let m = PatternMatcher::compile("t", &Rule::words(["a b c", "a b"])).unwrap();
        let text = "a b cd";
        assert_eq!(ranges(&m.scan(text)), vec![(0, 3)]);
    }

    #[test]
    fn test_punctuation_edged_word() {
        let m = PatternMatcher::compile("t", &Rule::words_case_sensitive(["C++"])).unwrap();
        assert_eq!(ranges(&m.scan("I like C++ a lot")), vec![(7, 10)]);
        assert!(m.scan("ABC++").is_empty());
    }

    #[test]
    fn test_placeholder_with_whitespace() {
        let m = PatternMatcher::compile("var", &Rule::pattern("{{ identifier }}")).unwrap();
        let text = "Hello {{ user.name }}, welcome {{plan}}";
        let spans = m.scan(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].as_str(text), "{{ user.name }}");
        assert_eq!(spans[1].as_str(text), "{{plan}}");
    }

    #[test]
    fn test_placeholder_rejects_invalid_identifier() {
        let m = PatternMatcher::compile("var", &Rule::pattern("{{ identifier }}")).unwrap();
        assert!(m.scan("{{ user name }}").is_empty());
        assert!(m.scan("{{}}").is_empty());
    }

    #[test]
    fn test_adjacent_placeholders_do_not_overlap() {
        let m = PatternMatcher::compile("var", &Rule::pattern("{{ identifier }}")).unwrap();
        assert_eq!(ranges(&m.scan("{{a}}{{b}}")), vec![(0, 5), (5, 10)]);
    }

    #[test]
    fn test_zero_length_matches_skipped() {
        let m = PatternMatcher::compile("x", &Rule::regex("x*")).unwrap();
        assert_eq!(ranges(&m.scan("abxxcx")), vec![(2, 4), (5, 6)]);
        assert!(m.scan("").is_empty());
        assert!(m.scan("ééé").is_empty());
    }

    #[test]
    fn test_word_boundary_sees_text_before_position() {
        // Resuming the scan mid-string must still see the preceding character.
        let m = PatternMatcher::compile("x", &Rule::regex(r"\bab")).unwrap();
        assert_eq!(ranges(&m.scan("ab ab")), vec![(0, 2), (3, 5)]);
        assert_eq!(ranges(&m.scan("abab")), vec![(0, 2)]);
    }

    #[test]
    fn test_match_inside_single_grapheme_is_dropped() {
        // "e" followed by a combining acute accent is one grapheme.
        let m = PatternMatcher::compile("x", &Rule::regex("e")).unwrap();
        let text = "e\u{301}te";
        assert_eq!(ranges(&m.scan(text)), vec![(4, 5)]);
    }

    #[test]
    fn test_match_starting_mid_grapheme_is_dropped() {
        let m = PatternMatcher::compile("x", &Rule::regex("\u{301}t")).unwrap();
        assert!(m.scan("e\u{301}te").is_empty());
    }

    #[test]
    fn test_line_ending_before_crlf_keeps_line() {
        // "\r\n" is a single grapheme, so the match is cut back to "hello".
        let m = PatternMatcher::compile("line", &Rule::regex(r"[^\n]+")).unwrap();
        let text = "hello\r\nworld";
        let spans = m.scan(text);
        assert_eq!(ranges(&spans), vec![(0, 5), (7, 12)]);
        assert_eq!(spans[0].as_str(text), "hello");
    }

    #[test]
    fn test_long_line_before_crlf_scans_once() {
        let m = PatternMatcher::compile("line", &Rule::regex(r"[^\n]+")).unwrap();
        let text = format!("{}\r\n", "a".repeat(20_000));
        let started = std::time::Instant::now();
        assert_eq!(ranges(&m.scan(&text)), vec![(0, 20_000)]);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_regex_fails_at_compile() {
        let err = PatternMatcher::compile("bad", &Rule::regex("(unclosed")).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidRegex { ref rule, .. } if rule == "bad"));
    }

    #[test]
    fn test_scan_is_pure() {
        let m = PatternMatcher::compile("bold", &Rule::words(["ASAP"])).unwrap();
        let first = m.scan("ASAP ASAP");
        let _ = m.scan("unrelated ASAP text");
        assert_eq!(first, m.scan("ASAP ASAP"));
        assert_eq!(ranges(&first), vec![(0, 4), (5, 9)]);
    }
}
