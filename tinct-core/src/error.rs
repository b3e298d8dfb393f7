//! Error types
//!
//! Tokenizing itself never fails: unmatched text always falls through to a plain leaf. Errors
//! come from building grammars, from hook callbacks, and from serializing token trees.

use std::fmt;

/// Errors raised while building or registering a grammar
#[derive(Debug, Clone, PartialEq)]
pub enum GrammarError {
    /// A rule pattern failed to compile
    InvalidPattern { pattern: String, message: String },
    /// A grammar referenced by name is not registered
    UnknownGrammar(String),
    /// A token name expected in a grammar is absent (e.g. an insert-before anchor)
    UnknownToken { grammar: String, token: String },
    /// A declarative grammar file could not be read or has the wrong shape
    InvalidDefinition(String),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid pattern /{}/: {}", pattern, message)
            }
            GrammarError::UnknownGrammar(name) => write!(f, "Unknown grammar '{}'", name),
            GrammarError::UnknownToken { grammar, token } => {
                write!(f, "Grammar '{}' has no token named '{}'", grammar, token)
            }
            GrammarError::InvalidDefinition(msg) => {
                write!(f, "Invalid grammar definition: {}", msg)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// Error returned by a hook callback
///
/// Hooks are not caught or suppressed: the error aborts the cycle that fired the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookError {
    pub message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for HookError {}

/// Errors raised by token tree serializers
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No format registered under this name
    FormatNotFound(String),
    /// The serializer failed
    Serialization(String),
    /// A wrap hook failed while rendering
    Hook(HookError),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{}' not found", name),
            FormatError::Serialization(msg) => write!(f, "Serialization failed: {}", msg),
            FormatError::Hook(err) => write!(f, "Hook 'wrap' failed: {}", err),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Hook(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HookError> for FormatError {
    fn from(err: HookError) -> Self {
        FormatError::Hook(err)
    }
}

/// Errors from a full highlight cycle
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightError {
    /// No grammar is registered for the requested language
    UnknownLanguage(String),
    /// A lifecycle hook returned an error
    Hook { hook: String, source: HookError },
    /// The output format failed
    Format(FormatError),
}

impl fmt::Display for HighlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightError::UnknownLanguage(name) => {
                write!(f, "No grammar registered for language '{}'", name)
            }
            HighlightError::Hook { hook, source } => {
                write!(f, "Hook '{}' failed: {}", hook, source)
            }
            HighlightError::Format(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for HighlightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HighlightError::Hook { source, .. } => Some(source),
            HighlightError::Format(err) => Some(err),
            HighlightError::UnknownLanguage(_) => None,
        }
    }
}

impl From<FormatError> for HighlightError {
    fn from(err: FormatError) -> Self {
        HighlightError::Format(err)
    }
}
