//! Compiled rule patterns
//!
//! A thin wrapper over [`regex::Regex`] that keeps the source text around and knows how to
//! strip a lookbehind prefix. Lookbehind is emulated the usual way: the pattern's first capture
//! group matches the context before the token, and the token itself starts where that group ends.
//!
//! ```text
//! Pattern:  (^|[^.])\b(?:if|else)\b     lookbehind = true
//! Text:     "x if"
//! Match:    " if"  ->  prefix " " stays text, token covers "if"
//! ```

use crate::error::GrammarError;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// A compiled regular expression for one rule
#[derive(Clone)]
pub struct Pattern {
    source: String,
    case_insensitive: bool,
    regex: Regex,
}

/// Where a pattern matched inside a haystack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch {
    /// Start of the whole match, lookbehind prefix included
    pub match_start: usize,
    /// Start of the token text (after the lookbehind prefix)
    pub start: usize,
    /// End of the match
    pub end: usize,
}

impl PatternMatch {
    /// Whether the token part of the match is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift every offset by `delta` (used when matching against a suffix of a segment)
    pub fn offset(self, delta: usize) -> Self {
        Self {
            match_start: self.match_start + delta,
            start: self.start + delta,
            end: self.end + delta,
        }
    }
}

impl Pattern {
    /// Compile a case-sensitive pattern
    pub fn new(source: &str) -> Result<Self, GrammarError> {
        Self::build(source, false)
    }

    /// Compile a pattern that ignores case
    pub fn case_insensitive(source: &str) -> Result<Self, GrammarError> {
        Self::build(source, true)
    }

    fn build(source: &str, case_insensitive: bool) -> Result<Self, GrammarError> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| GrammarError::InvalidPattern {
                pattern: source.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            source: source.to_string(),
            case_insensitive,
            regex,
        })
    }

    /// Search `haystack` starting at byte offset `start`.
    ///
    /// The whole haystack stays visible to the regex, so `^` only matches at offset 0 and word
    /// boundaries see the text before `start`. With `lookbehind`, the first capture group is
    /// excluded from the token span.
    pub fn find_at(&self, haystack: &str, start: usize, lookbehind: bool) -> Option<PatternMatch> {
        if start > haystack.len() {
            return None;
        }

        if !lookbehind {
            let m = self.regex.find_at(haystack, start)?;
            return Some(PatternMatch {
                match_start: m.start(),
                start: m.start(),
                end: m.end(),
            });
        }

        let caps = self.regex.captures_at(haystack, start)?;
        let whole = caps.get(0)?;
        let prefix = caps.get(1).map_or(0, |group| group.len());

        Some(PatternMatch {
            match_start: whole.start(),
            start: (whole.start() + prefix).min(whole.end()),
            end: whole.end(),
        })
    }

    /// The pattern source as written in the grammar
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.case_insensitive {
            write!(f, "/{}/i", self.source)
        } else {
            write!(f, "/{}/", self.source)
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.case_insensitive == other.case_insensitive
    }
}
