//! MarkerScanner - locates `<prefix><word>` marker syntax via Regex
//!
//! The prefix is caller data, never grammar: it is escaped before being
//! compiled, so `$`, `(`, `*` and friends match literally.
//!
//! Matches come out left-to-right and non-overlapping (leftmost-first regex
//! semantics, greedy word run).

use regex::{CaptureMatches, Regex};
use serde::{Deserialize, Serialize};

use crate::config::WordSyntax;
use crate::error::RevealError;

const ASCII_WORD: &str = "[0-9A-Za-z_]+";
const UNICODE_WORD: &str = r"\w+";

// ==================== TYPE DEFINITIONS ====================

/// One marker occurrence. Offsets are byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerMatch {
    /// Start of the prefix
    pub start: usize,
    /// End of the word run (exclusive)
    pub end: usize,
    /// The captured word run, without the prefix
    pub token: String,
}

impl MarkerMatch {
    /// Byte offset where the token begins (just after the prefix)
    pub fn token_start(&self) -> usize {
        self.end - self.token.len()
    }
}

// ==================== MAIN IMPLEMENTATION ====================

/// Compiled matcher for a single prefix
#[derive(Debug, Clone)]
pub struct MarkerScanner {
    prefix: String,
    word_syntax: WordSyntax,
    marker_re: Regex,
}

impl MarkerScanner {
    /// Compile a scanner for `prefix`. An empty prefix fails fast.
    pub fn new(prefix: &str, word_syntax: WordSyntax) -> Result<Self, RevealError> {
        if prefix.is_empty() {
            return Err(RevealError::InvalidConfiguration(
                "prefix must not be empty".to_string(),
            ));
        }

        let word = match word_syntax {
            WordSyntax::Ascii => ASCII_WORD,
            WordSyntax::Unicode => UNICODE_WORD,
        };
        // Group 1: the token
        let pattern = format!("{}({})", regex::escape(prefix), word);
        let marker_re = Regex::new(&pattern).map_err(|e| {
            RevealError::InvalidConfiguration(format!("prefix {:?} cannot be compiled: {}", prefix, e))
        })?;

        Ok(Self {
            prefix: prefix.to_string(),
            word_syntax,
            marker_re,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn word_syntax(&self) -> WordSyntax {
        self.word_syntax
    }

    /// Lazily scan `text`. Each call starts over from the beginning.
    pub fn scan<'r, 't>(&'r self, text: &'t str) -> MarkerMatches<'r, 't> {
        MarkerMatches {
            inner: self.marker_re.captures_iter(text),
        }
    }

    /// True if `text` holds at least one marker
    pub fn has_match(&self, text: &str) -> bool {
        self.marker_re.is_match(text)
    }
}

/// Lazy, finite iterator over marker matches
pub struct MarkerMatches<'r, 't> {
    inner: CaptureMatches<'r, 't>,
}

impl Iterator for MarkerMatches<'_, '_> {
    type Item = MarkerMatch;

    fn next(&mut self) -> Option<MarkerMatch> {
        let cap = self.inner.next()?;
        let full = cap.get(0)?;
        let token = cap.get(1)?;
        Some(MarkerMatch {
            start: full.start(),
            end: full.end(),
            token: token.as_str().to_string(),
        })
    }
}

/// One-off scan with ascii word syntax
pub fn scan(text: &str, prefix: &str) -> Result<Vec<MarkerMatch>, RevealError> {
    let scanner = MarkerScanner::new(prefix, WordSyntax::Ascii)?;
    Ok(scanner.scan(text).collect())
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn ascii(prefix: &str) -> MarkerScanner {
        MarkerScanner::new(prefix, WordSyntax::Ascii).unwrap()
    }

    #[test]
    fn test_single_marker() {
        let matches = scan("Please re:obsidian now", "re:").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].token, "obsidian");
        assert_eq!(matches[0].start, 7);
        assert_eq!(matches[0].end, 18);
        assert_eq!(matches[0].token_start(), 10);
    }

    #[test]
    fn test_multiple_markers_in_order() {
        let text = "re:alpha, then re:beta and re:gamma_2";
        let tokens: Vec<_> = ascii("re:").scan(text).map(|m| m.token).collect();
        assert_eq!(tokens, vec!["alpha", "beta", "gamma_2"]);
    }

    #[test]
    fn test_no_whitespace_requirement() {
        let matches = scan("xre:yes", "re:").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].token, "yes");
        assert_eq!(matches[0].start, 1);
    }

    #[test]
    fn test_word_run_stops_at_punctuation() {
        let matches = scan("re:don't", "re:").unwrap();
        assert_eq!(matches[0].token, "don");
    }

    #[test]
    fn test_prefix_without_word_is_not_a_match() {
        assert!(scan("re: nothing here re:", "re:").unwrap().is_empty());
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let scanner = ascii("$(");
        let matches: Vec<_> = scanner.scan("cost $(secret) and $$(x").collect();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].token, "secret");
        assert_eq!(matches[1].token, "x");

        // `.` must not behave as a wildcard
        assert!(ascii("a.").scan("abword").next().is_none());
        assert_eq!(ascii("a.").scan("a.word").next().unwrap().token, "word");
    }

    #[test]
    fn test_empty_prefix_fails_fast() {
        let err = MarkerScanner::new("", WordSyntax::Ascii).unwrap_err();
        assert!(matches!(err, RevealError::InvalidConfiguration(_)));
        assert!(scan("anything", "").is_err());
    }

    #[test]
    fn test_ascii_rejects_non_ascii_letters() {
        assert!(scan("re:über", "re:").unwrap().is_empty());
        assert_eq!(scan("re:caféine", "re:").unwrap()[0].token, "caf");
    }

    #[test]
    fn test_unicode_word_syntax() {
        let scanner = MarkerScanner::new("re:", WordSyntax::Unicode).unwrap();
        let matches: Vec<_> = scanner.scan("ein re:über Wort").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].token, "über");
        assert_eq!(&"ein re:über Wort"[matches[0].start..matches[0].end], "re:über");
    }

    #[test]
    fn test_scan_is_restarted_per_call() {
        let scanner = ascii("re:");
        let text = "re:one re:two";
        assert_eq!(scanner.scan(text).count(), 2);
        assert_eq!(scanner.scan(text).count(), 2);
        assert!(scanner.has_match(text));
        assert!(!scanner.has_match("plain"));
    }

    #[test]
    fn test_matches_are_increasing_and_disjoint() {
        let text = "re:a re:bb re:re:ccc xre:d re:e_f re:";
        let matches: Vec<_> = ascii("re:").scan(text).collect();
        assert!(!matches.is_empty());
        for pair in matches.windows(2) {
            assert!(pair[0].start < pair[1].start);
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_prefix_ending_in_word_char_is_first_match_wins() {
        // The first prefix captures "re"; the leftover ":ccc" has no prefix
        let matches: Vec<_> = ascii("re:").scan("re:re:ccc").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].token, "re");
        assert_eq!(matches[0].end, 5);
    }
}
