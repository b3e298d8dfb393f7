//! Tokenizing
//!
//!     The engine is a single pass per rule over a flat list of segments. Tokens produced by a
//!     rule are final for the rest of that level; only the text between them is offered to later
//!     rules. Nested grammars are run on a token's matched text, producing its children.
//!
//!     See [`engine`] for the matching details.

pub mod engine;

pub use engine::{tokenize, Detached, TokenizeOptions, Tokenizer, DEFAULT_MAX_DEPTH};
