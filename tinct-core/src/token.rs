//! Token tree types and helpers shared by the tokenizer, the formats and tooling.

pub mod core;
pub mod formatting;

pub use self::core::{Content, Token, TypedToken};
pub use formatting::{detokenize, to_tree_string, ToSourceString};
