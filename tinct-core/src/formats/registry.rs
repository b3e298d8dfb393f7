//! Format registry for format discovery and selection

use super::format::Format;
use super::{HtmlFormat, JsonFormat, TextFormat, TreeFormat};
use crate::error::FormatError;
use crate::hooks::HookRegistry;
use crate::token::Token;
use std::collections::HashMap;

/// Registry of token tree formats, keyed by name
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let html = registry.serialize(&tokens, "mini", "html", &hooks)?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Serialize tokens using the specified format
    pub fn serialize(
        &self,
        tokens: &[Token],
        language: &str,
        format: &str,
        hooks: &HookRegistry,
    ) -> Result<String, FormatError> {
        self.get(format)?.serialize(tokens, language, hooks)
    }

    /// Create a registry with the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(HtmlFormat::default());
        registry.register(JsonFormat);
        registry.register(TreeFormat);
        registry.register(TextFormat);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
