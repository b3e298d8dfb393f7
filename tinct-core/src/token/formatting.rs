//! Detokenizing and debug views
//!
//! Converting a token tree back to its source text is the round-trip check used all over the
//! tests: whatever the grammar, `detokenize(&tokenize(text, &grammar)) == text`.

use super::core::{Content, Token};

/// Trait for converting a token back to the source text it covers
pub trait ToSourceString {
    fn to_source_string(&self) -> String;
}

impl ToSourceString for Token {
    fn to_source_string(&self) -> String {
        self.text()
    }
}

impl ToSourceString for [Token] {
    fn to_source_string(&self) -> String {
        detokenize(self)
    }
}

/// Concatenate the leaf text of a token sequence, in order
///
/// # Examples
///
/// ```ignore
/// let tokens = tokenize("ab12cd", &grammar);
/// assert_eq!(detokenize(&tokens), "ab12cd");
/// ```
pub fn detokenize(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        token.push_text(&mut out);
    }
    out
}

/// Render a token tree as an indented listing, one token per line
///
/// ```text
/// "x = "
/// string [literal]
///   punctuation "\""
///   "hi"
///   punctuation "\""
/// ```
pub fn to_tree_string(tokens: &[Token]) -> String {
    let mut out = String::new();
    write_tree(tokens, 0, &mut out);
    out
}

fn write_tree(tokens: &[Token], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for token in tokens {
        match token {
            Token::Text(text) => out.push_str(&format!("{}{:?}\n", indent, text)),
            Token::Typed(typed) => {
                let aliases = if typed.alias.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", typed.alias.join(", "))
                };
                match &typed.content {
                    Content::Text(text) => {
                        out.push_str(&format!("{}{}{} {:?}\n", indent, typed.kind, aliases, text))
                    }
                    Content::Tokens(children) => {
                        out.push_str(&format!("{}{}{}\n", indent, typed.kind, aliases));
                        write_tree(children, depth + 1, out);
                    }
                }
            }
        }
    }
}
