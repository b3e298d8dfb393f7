//! Format trait definition

use crate::error::FormatError;
use crate::hooks::HookRegistry;
use crate::token::Token;

/// Trait for token tree serializers
///
/// # Examples
///
/// ```ignore
/// struct KindsFormat;
///
/// impl Format for KindsFormat {
///     fn name(&self) -> &str {
///         "kinds"
///     }
///
///     fn serialize(&self, tokens: &[Token], _: &str, _: &HookRegistry) -> Result<String, FormatError> {
///         Ok(tokens.iter().filter_map(Token::kind).collect::<Vec<_>>().join(" "))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name this format is selected by (e.g. "html", "json")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// Serialize a token sequence produced for `language`
    fn serialize(
        &self,
        tokens: &[Token],
        language: &str,
        hooks: &HookRegistry,
    ) -> Result<String, FormatError>;
}
