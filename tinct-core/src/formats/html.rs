//! HTML output
//!
//! Strategy: one linear pass over the token tree, writing each typed token as an element whose
//! class list is the base class, the token type, then its aliases:
//!
//!     "x = "                      x =
//!     number "42"          =>     <span class="token number">42</span>
//!     string [literal] ...        <span class="token string literal">...</span>
//!
//! Text is escaped (`&`, `<`, `>`) and nothing else is added, so [`strip_markup`] recovers the
//! source text exactly. Before an element is written, the `wrap` callbacks of the hook registry
//! may change its tag, classes, attributes and rendered content.

use super::format::Format;
use crate::error::FormatError;
use crate::hooks::{HookRegistry, WrapEnv};
use crate::token::{Content, Token, TypedToken};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&(amp|lt|gt|quot);").unwrap());

/// Element settings for [`HtmlFormat`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Element name used for every token
    pub tag: String,
    /// First class of every token element
    pub token_class: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            tag: "span".to_string(),
            token_class: "token".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    options: HtmlOptions,
}

impl HtmlFormat {
    pub fn new(options: HtmlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    fn write_tokens(
        &self,
        tokens: &[Token],
        language: &str,
        hooks: &HookRegistry,
        out: &mut String,
    ) -> Result<(), FormatError> {
        for token in tokens {
            match token {
                Token::Text(text) => out.push_str(&escape_text(text)),
                Token::Typed(typed) => self.write_typed(typed, language, hooks, out)?,
            }
        }
        Ok(())
    }

    fn write_typed(
        &self,
        token: &TypedToken,
        language: &str,
        hooks: &HookRegistry,
        out: &mut String,
    ) -> Result<(), FormatError> {
        let mut content = String::new();
        match &token.content {
            Content::Text(text) => content.push_str(&escape_text(text)),
            Content::Tokens(children) => self.write_tokens(children, language, hooks, &mut content)?,
        }

        let mut classes = Vec::with_capacity(2 + token.alias.len());
        classes.push(self.options.token_class.clone());
        classes.push(token.kind.clone());
        classes.extend(token.alias.iter().cloned());

        let mut env = WrapEnv {
            kind: token.kind.clone(),
            content,
            tag: self.options.tag.clone(),
            classes,
            attributes: Vec::new(),
            language: language.to_string(),
        };
        hooks.run_wrap(&mut env)?;

        out.push('<');
        out.push_str(&env.tag);
        out.push_str(" class=\"");
        out.push_str(&escape_attribute(&env.classes.join(" ")));
        out.push('"');
        for (name, value) in &env.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attribute(value));
            out.push('"');
        }
        out.push('>');
        out.push_str(&env.content);
        out.push_str("</");
        out.push_str(&env.tag);
        out.push('>');
        Ok(())
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Token elements with class names, for CSS highlighting themes"
    }

    fn serialize(
        &self,
        tokens: &[Token],
        language: &str,
        hooks: &HookRegistry,
    ) -> Result<String, FormatError> {
        let mut out = String::new();
        self.write_tokens(tokens, language, hooks, &mut out)?;
        Ok(out)
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Remove all elements and decode the entities written by [`HtmlFormat`]
pub fn strip_markup(html: &str) -> String {
    let text = TAG.replace_all(html, "");
    ENTITY
        .replace_all(&text, |caps: &Captures| match &caps[1] {
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            _ => "&",
        })
        .into_owned()
}
