//! Shared configuration loader for the tinct toolchain.
//!
//! `defaults/tinct.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`TinctConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use tinct_core::formats::HtmlOptions;
use tinct_core::TokenizeOptions;

const DEFAULT_TOML: &str = include_str!("../defaults/tinct.default.toml");

/// Top-level configuration consumed by tinct applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TinctConfig {
    pub tokenizer: TokenizerConfig,
    pub html: HtmlConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerConfig {
    pub max_depth: usize,
}

/// Mirrors the knobs exposed by the HTML format.
#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    pub tag: String,
    pub token_class: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl From<&TokenizerConfig> for TokenizeOptions {
    fn from(config: &TokenizerConfig) -> Self {
        TokenizeOptions {
            max_depth: config.max_depth,
        }
    }
}

impl From<&HtmlConfig> for HtmlOptions {
    fn from(config: &HtmlConfig) -> Self {
        HtmlOptions {
            tag: config.tag.clone(),
            token_class: config.token_class.clone(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TinctConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TinctConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.tokenizer.max_depth, 100);
        assert_eq!(config.html.tag, "span");
        assert_eq!(config.html.token_class, "token");
        assert_eq!(config.output.format, "html");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.format", "json")
            .expect("override to apply")
            .set_override("tokenizer.max_depth", 8i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "json");
        assert_eq!(config.tokenizer.max_depth, 8);
    }

    #[test]
    fn layers_user_file_over_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("tinct.toml");
        std::fs::write(&path, "[html]\ntag = \"code\"\n").expect("write config");

        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert_eq!(config.html.tag, "code");
        assert_eq!(config.html.token_class, "token");
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("/nonexistent/tinct.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/tinct.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "html");
    }

    #[test]
    fn converts_to_core_options() {
        let config = load_defaults().expect("defaults to deserialize");
        let html = HtmlOptions::from(&config.html);
        assert_eq!(html, HtmlOptions::default());
        assert_eq!(
            TokenizeOptions::from(&config.tokenizer),
            TokenizeOptions::default()
        );
    }
}
