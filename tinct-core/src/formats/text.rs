//! Plain text output: the detokenized source

use super::format::Format;
use crate::error::FormatError;
use crate::hooks::HookRegistry;
use crate::token::{detokenize, Token};

#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Source text with all markup removed"
    }

    fn serialize(&self, tokens: &[Token], _: &str, _: &HookRegistry) -> Result<String, FormatError> {
        Ok(detokenize(tokens))
    }
}
