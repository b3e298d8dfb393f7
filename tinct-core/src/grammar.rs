//! Grammar Model
//!
//!     A grammar is an ordered rule set for one language or context. Each token-type name maps to
//!     a single [`Rule`] or an ordered list of alternatives ([`RuleSet`]). Order is priority:
//!     the tokenizer tries names top to bottom, alternatives left to right, and text claimed by an
//!     earlier rule is never looked at again by a later one.
//!
//!     Grammars are built once, at registration, and are read-only while tokenizing. New grammars
//!     are derived by copying: [`Grammar::extend`] overrides and appends entries,
//!     [`Grammar::insert_before`] splices entries ahead of an anchor.
//!
//! Nesting
//!
//!     A rule's `inside` grammar tokenizes the text the rule matched. It may be an inline
//!     grammar, a registered language looked up by name at tokenize time, or the grammar
//!     currently being applied ([`GrammarRef::SelfRef`]), which is how recursive constructs
//!     such as nested braces are written.

pub mod definition;
pub mod model;
pub mod pattern;
pub mod rule;

pub use definition::{GrammarDef, LanguageDef};
pub use model::Grammar;
pub use pattern::{Pattern, PatternMatch};
pub use rule::{GrammarRef, Rule, RuleSet};
