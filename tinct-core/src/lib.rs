//! # tinct-core
//!
//! A grammar-driven tokenizer for syntax highlighting.
//!
//! Layout
//!
//!     A [grammar](grammar) is an ordered rule set: token-type names mapped to regex rules, tried
//!     top to bottom. The [tokenizing] engine walks those rules over a list of unclaimed text
//!     segments and replaces matched spans with typed [tokens](token), recursing into nested
//!     grammars. [formats] turn the resulting tree into HTML, JSON, a debug tree or plain text.
//!
//!     src/
//!       ├── grammar       Rules, patterns, grammar splicing, declarative grammar files
//!       ├── registry      Named grammars and builder functions
//!       ├── tokenizing    The matching engine
//!       ├── token         Token tree and detokenizing helpers
//!       ├── hooks         Lifecycle extension points
//!       ├── formats       Serializers over token trees
//!       └── highlighter   The facade tying the above together
//!
//! The central invariant, checked throughout the tests: concatenating the leaf text of any
//! token tree in order gives back the input exactly.

pub mod error;
pub mod formats;
pub mod grammar;
pub mod highlighter;
pub mod hooks;
pub mod registry;
pub mod testing;
pub mod token;
pub mod tokenizing;

pub use error::{GrammarError, HighlightError, HookError};
pub use grammar::{Grammar, GrammarRef, Pattern, Rule, RuleSet};
pub use highlighter::Highlighter;
pub use hooks::{Hook, HookEnv, HookId, HookRegistry, WrapEnv};
pub use registry::{GrammarBuilder, GrammarResolver, Registry};
pub use token::{detokenize, Content, Token, TypedToken};
pub use tokenizing::{tokenize, TokenizeOptions, Tokenizer};
