//! JSON output
//!
//! Text leaves are strings, typed tokens are `{"type", "content", "alias"}` objects.

use super::format::Format;
use crate::error::FormatError;
use crate::hooks::HookRegistry;
use crate::token::Token;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Token tree as JSON"
    }

    fn serialize(&self, tokens: &[Token], _: &str, _: &HookRegistry) -> Result<String, FormatError> {
        serde_json::to_string_pretty(tokens).map_err(|e| FormatError::Serialization(e.to_string()))
    }
}
