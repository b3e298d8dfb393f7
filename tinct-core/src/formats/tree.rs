//! Indented tree output, one token per line

use super::format::Format;
use crate::error::FormatError;
use crate::hooks::HookRegistry;
use crate::token::{to_tree_string, Token};

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeFormat;

impl Format for TreeFormat {
    fn name(&self) -> &str {
        "tree"
    }

    fn description(&self) -> &str {
        "Indented token tree for debugging grammars"
    }

    fn serialize(&self, tokens: &[Token], _: &str, _: &HookRegistry) -> Result<String, FormatError> {
        Ok(to_tree_string(tokens))
    }
}
