//! The matching engine
//!
//!     tokenize(text, grammar):
//!         segments = [Text(text)]
//!         for (name, rules) in grammar (rest entries merged in):
//!             for rule in rules:
//!                 for every Text segment, left to right:
//!                     split it into text / token / text / token / ... pieces
//!         return segments
//!
//! Splitting a segment
//!
//!     Non-greedy rules search the unclaimed remainder of the segment as a haystack of its own,
//!     so `^` and `\b` restart after every token. Greedy rules search the whole segment from the
//!     position after the previous token, keeping the segment's earlier text as context.
//!
//!     With lookbehind, the pattern's first group is context: it stays in the text piece before
//!     the token, and the next search starts after the token.
//!
//!     A match with an empty token span creates nothing and moves the search one character on,
//!     which bounds the loop by the segment length.

use crate::grammar::{Grammar, GrammarRef, Rule};
use crate::registry::GrammarResolver;
use crate::token::{Content, Token};
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

/// Default limit on nested `inside` tokenization
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Knobs for a tokenizer run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizeOptions {
    /// Nesting depth past which matched text is kept as a plain string
    pub max_depth: usize,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Resolver that knows no grammars; named references stay unresolved
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl GrammarResolver for Detached {
    fn resolve(&self, _name: &str) -> Option<Arc<Grammar>> {
        None
    }
}

/// Tokenize `text` with a standalone grammar.
///
/// Named `inside` references cannot be resolved without a registry and leave the matched text
/// as a plain string; use [`Tokenizer`] with a [`Registry`](crate::Registry) for those.
pub fn tokenize(text: &str, grammar: &Grammar) -> Vec<Token> {
    Tokenizer::new(&Detached).tokenize(text, grammar)
}

/// Runs grammars over text, resolving named grammars through a resolver
pub struct Tokenizer<'r> {
    resolver: &'r dyn GrammarResolver,
    options: TokenizeOptions,
}

/// A grammar either borrowed from the caller or held through the registry
enum GrammarHandle<'g> {
    Borrowed(&'g Grammar),
    Shared(Arc<Grammar>),
}

impl Deref for GrammarHandle<'_> {
    type Target = Grammar;

    fn deref(&self) -> &Grammar {
        match self {
            GrammarHandle::Borrowed(grammar) => grammar,
            GrammarHandle::Shared(grammar) => grammar,
        }
    }
}

impl<'r> Tokenizer<'r> {
    pub fn new(resolver: &'r dyn GrammarResolver) -> Self {
        Self {
            resolver,
            options: TokenizeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TokenizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> TokenizeOptions {
        self.options
    }

    /// Tokenize `text` with `grammar`
    pub fn tokenize(&self, text: &str, grammar: &Grammar) -> Vec<Token> {
        self.tokenize_at(text, grammar, 0)
    }

    fn tokenize_at(&self, text: &str, grammar: &Grammar, depth: usize) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }

        let grammar = self.merge_rest(grammar);
        let mut segments = vec![Token::Text(text.to_string())];

        for (name, rules) in grammar.iter() {
            for rule in rules.rules() {
                tracing::trace!(token = name, pattern = rule.pattern.as_str(), depth, "rule pass");
                self.apply_rule(&mut segments, name, rule, &grammar, depth);
            }
        }

        segments
    }

    /// Append the entries of the rest chain, following it until it ends, repeats or breaks
    fn merge_rest<'g>(&self, grammar: &'g Grammar) -> Cow<'g, Grammar> {
        let Some(mut next) = grammar.rest().cloned() else {
            return Cow::Borrowed(grammar);
        };

        let mut merged = grammar.clone();
        let mut seen: Vec<String> = Vec::new();
        loop {
            let rest = match &next {
                GrammarRef::Inline(rest) => GrammarHandle::Shared(Arc::clone(rest)),
                GrammarRef::Named(name) => {
                    if seen.contains(name) {
                        break;
                    }
                    seen.push(name.clone());
                    match self.resolver.resolve(name) {
                        Some(rest) => GrammarHandle::Shared(rest),
                        None => {
                            tracing::warn!(grammar = name.as_str(), "rest grammar not found");
                            break;
                        }
                    }
                }
                GrammarRef::SelfRef => break,
            };

            for (name, rules) in rest.iter() {
                merged.push(name, rules.clone());
            }
            match rest.rest() {
                Some(following) => next = following.clone(),
                None => break,
            }
        }

        merged.set_rest(None);
        Cow::Owned(merged)
    }

    fn apply_rule(
        &self,
        segments: &mut Vec<Token>,
        name: &str,
        rule: &Rule,
        grammar: &Grammar,
        depth: usize,
    ) {
        let mut index = 0;
        while index < segments.len() {
            let Token::Text(segment) = &segments[index] else {
                index += 1;
                continue;
            };

            match self.split_segment(segment, name, rule, grammar, depth) {
                Some(pieces) => {
                    let count = pieces.len();
                    segments.splice(index..=index, pieces);
                    index += count;
                }
                None => index += 1,
            }
        }
    }

    /// Split one text segment into text and token pieces, or `None` if the rule never matched
    fn split_segment(
        &self,
        segment: &str,
        name: &str,
        rule: &Rule,
        grammar: &Grammar,
        depth: usize,
    ) -> Option<Vec<Token>> {
        let mut pieces = Vec::new();
        // start of the text not yet claimed by this rule
        let mut claimed_to = 0;
        // where the next search begins
        let mut search_from = 0;

        while search_from <= segment.len() {
            let found = if rule.greedy {
                rule.pattern.find_at(segment, search_from, rule.lookbehind)
            } else {
                rule.pattern
                    .find_at(&segment[claimed_to..], search_from - claimed_to, rule.lookbehind)
                    .map(|m| m.offset(claimed_to))
            };
            let Some(found) = found else {
                break;
            };

            if found.is_empty() {
                search_from = if found.end > search_from {
                    found.end
                } else {
                    next_char_boundary(segment, search_from)
                };
                continue;
            }

            if found.start > claimed_to {
                pieces.push(Token::Text(segment[claimed_to..found.start].to_string()));
            }
            let matched = &segment[found.start..found.end];
            pieces.push(self.make_token(matched, name, rule, grammar, depth));

            claimed_to = found.end;
            search_from = found.end;
        }

        if pieces.is_empty() {
            return None;
        }
        if claimed_to < segment.len() {
            pieces.push(Token::Text(segment[claimed_to..].to_string()));
        }
        Some(pieces)
    }

    fn make_token(
        &self,
        matched: &str,
        name: &str,
        rule: &Rule,
        grammar: &Grammar,
        depth: usize,
    ) -> Token {
        let content = match &rule.inside {
            None => Content::Text(matched.to_string()),
            Some(inside) => match self.resolve_inside(inside, grammar) {
                Some(_) if depth >= self.options.max_depth => {
                    tracing::warn!(
                        token = name,
                        max_depth = self.options.max_depth,
                        "nesting limit reached, keeping matched text as a string"
                    );
                    Content::Text(matched.to_string())
                }
                Some(inner) => Content::Tokens(self.tokenize_at(matched, &inner, depth + 1)),
                None => Content::Text(matched.to_string()),
            },
        };

        Token::typed(name, content, rule.alias.clone())
    }

    fn resolve_inside<'g>(
        &self,
        inside: &'g GrammarRef,
        current: &'g Grammar,
    ) -> Option<GrammarHandle<'g>> {
        match inside {
            GrammarRef::SelfRef => Some(GrammarHandle::Borrowed(current)),
            GrammarRef::Inline(grammar) => Some(GrammarHandle::Borrowed(grammar)),
            GrammarRef::Named(name) => {
                let resolved = self.resolver.resolve(name);
                if resolved.is_none() {
                    tracing::warn!(grammar = name.as_str(), "inside grammar not found");
                }
                resolved.map(GrammarHandle::Shared)
            }
        }
    }
}

fn next_char_boundary(text: &str, from: usize) -> usize {
    text[from..]
        .chars()
        .next()
        .map_or(from + 1, |c| from + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::detokenize;

    fn rule(pattern: &str) -> Rule {
        Rule::new(pattern).unwrap()
    }

    fn kinds(tokens: &[Token]) -> Vec<(Option<&str>, String)> {
        tokens.iter().map(|t| (t.kind(), t.text())).collect()
    }

    #[test]
    fn test_empty_input() {
        let grammar = Grammar::new().with("any", rule(".*"));
        assert!(tokenize("", &grammar).is_empty());
    }

    #[test]
    fn test_no_rules_single_text_leaf() {
        let tokens = tokenize("plain", &Grammar::new());
        assert_eq!(tokens, vec![Token::from("plain")]);
    }

    #[test]
    fn test_non_greedy_reanchors_after_each_token() {
        let grammar = Grammar::new().with("a", rule("^a"));
        let tokens = tokenize("aaa", &grammar);
        assert_eq!(
            kinds(&tokens),
            vec![
                (Some("a"), "a".to_string()),
                (Some("a"), "a".to_string()),
                (Some("a"), "a".to_string()),
            ]
        );
    }

    #[test]
    fn test_greedy_keeps_segment_context() {
        let grammar = Grammar::new().with("a", rule("^a").greedy());
        let tokens = tokenize("aaa", &grammar);
        assert_eq!(
            kinds(&tokens),
            vec![(Some("a"), "a".to_string()), (None, "aa".to_string())]
        );
    }

    #[test]
    fn test_zero_width_pattern_terminates() {
        let grammar = Grammar::new().with("maybe", rule("x*"));
        let tokens = tokenize("abxxc", &grammar);
        assert_eq!(
            kinds(&tokens),
            vec![
                (None, "ab".to_string()),
                (Some("maybe"), "xx".to_string()),
                (None, "c".to_string()),
            ]
        );

        let grammar = Grammar::new().with("nothing", rule("").greedy());
        assert_eq!(tokenize("héllo", &grammar), vec![Token::from("héllo")]);
    }

    #[test]
    fn test_self_recursion_nests() {
        // The opening paren is lookbehind context, so each level tokenizes a shorter string
        let grammar = Grammar::new()
            .with(
                "group",
                rule(r"(\()(?:[^()]|\([^()]*\))*")
                    .lookbehind()
                    .inside(GrammarRef::SelfRef),
            )
            .with("word", rule("[a-z]+"));
        let tokens = tokenize("f(a(b))", &grammar);

        assert_eq!(detokenize(&tokens), "f(a(b))");
        assert_eq!(
            kinds(&tokens),
            vec![
                (Some("word"), "f".to_string()),
                (None, "(".to_string()),
                (Some("group"), "a(b)".to_string()),
                (None, ")".to_string()),
            ]
        );

        let outer = tokens[2].as_typed().unwrap().children().unwrap();
        assert_eq!(
            kinds(outer),
            vec![
                (Some("word"), "a".to_string()),
                (None, "(".to_string()),
                (Some("group"), "b".to_string()),
                (None, ")".to_string()),
            ]
        );
        let inner = outer[2].as_typed().unwrap().children().unwrap();
        assert_eq!(kinds(inner), vec![(Some("word"), "b".to_string())]);
    }

    #[test]
    fn test_depth_limit_keeps_text() {
        // Matches its whole input, so self recursion would never shrink
        let grammar = Grammar::new().with("all", rule(".+").inside(GrammarRef::SelfRef));
        let tokens = Tokenizer::new(&Detached)
            .with_options(TokenizeOptions { max_depth: 3 })
            .tokenize("abc", &grammar);

        let mut depth = 0;
        let mut current = &tokens[0];
        while let Some(children) = current.as_typed().and_then(|t| t.children()) {
            depth += 1;
            current = &children[0];
        }
        assert_eq!(depth, 3);
        assert_eq!(current.as_typed().map(|t| t.content.clone()), Some(Content::Text("abc".into())));
        assert_eq!(detokenize(&tokens), "abc");
    }

    #[test]
    fn test_unresolved_named_inside_keeps_text() {
        let grammar = Grammar::new().with("style", rule("<[^>]*>").inside(GrammarRef::named("css")));
        let tokens = tokenize("a<b>", &grammar);
        assert_eq!(
            tokens[1].as_typed().unwrap().content,
            Content::Text("<b>".into())
        );
    }

    #[test]
    fn test_rest_entries_run_after_own_entries() {
        let rest = Grammar::new()
            .with("word", rule("[a-z]+"))
            .with("number", rule(r"\d+"));
        let grammar = Grammar::new()
            .with("number", rule(r"\d"))
            .with_rest(GrammarRef::inline(rest));

        // `number` from rest replaces the own entry in place, `word` is appended
        let tokens = tokenize("ab12", &grammar);
        assert_eq!(
            kinds(&tokens),
            vec![(Some("word"), "ab".to_string()), (Some("number"), "12".to_string())]
        );
    }
}
