//! Core token types
//!
//! A token is either a run of plain text or a typed node. Typed nodes carry their type name, the
//! matched text (as a string, or as a nested token sequence when the rule had an `inside`
//! grammar) and the rule's alias names.
//!
//! Serialization follows the usual JSON shape for highlighter token streams: text leaves are bare
//! strings, typed tokens are objects.
//!
//! ```text
//! ["x = ", {"type": "number", "content": "42"}, {"type": "string", "content": ["\"", ...]}]
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    /// Untokenized text
    Text(String),
    /// A span claimed by a rule
    Typed(TypedToken),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedToken {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Content,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Tokens(Vec<Token>),
}

impl Token {
    pub fn text_leaf(text: impl Into<String>) -> Self {
        Token::Text(text.into())
    }

    pub fn typed(kind: impl Into<String>, content: Content, alias: Vec<String>) -> Self {
        Token::Typed(TypedToken {
            kind: kind.into(),
            content,
            alias,
        })
    }

    /// The source text covered by this token
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    pub(crate) fn push_text(&self, out: &mut String) {
        match self {
            Token::Text(text) => out.push_str(text),
            Token::Typed(typed) => typed.content.push_text(out),
        }
    }

    /// Byte length of the covered source text
    pub fn len(&self) -> usize {
        match self {
            Token::Text(text) => text.len(),
            Token::Typed(typed) => typed.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type name of a typed token, `None` for text
    pub fn kind(&self) -> Option<&str> {
        match self {
            Token::Text(_) => None,
            Token::Typed(typed) => Some(&typed.kind),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text(_))
    }

    pub fn as_typed(&self) -> Option<&TypedToken> {
        match self {
            Token::Typed(typed) => Some(typed),
            Token::Text(_) => None,
        }
    }
}

impl TypedToken {
    /// The source text covered by this token
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.content.push_text(&mut out);
        out
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `name` is the type or one of the aliases
    pub fn is(&self, name: &str) -> bool {
        self.kind == name || self.alias.iter().any(|alias| alias == name)
    }

    /// Nested tokens, when the content was tokenized with an inside grammar
    pub fn children(&self) -> Option<&[Token]> {
        match &self.content {
            Content::Tokens(tokens) => Some(tokens),
            Content::Text(_) => None,
        }
    }
}

impl Content {
    pub(crate) fn push_text(&self, out: &mut String) {
        match self {
            Content::Text(text) => out.push_str(text),
            Content::Tokens(tokens) => tokens.iter().for_each(|t| t.push_text(out)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Content::Text(text) => text.len(),
            Content::Tokens(tokens) => tokens.iter().map(Token::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::text_leaf(text)
    }
}
