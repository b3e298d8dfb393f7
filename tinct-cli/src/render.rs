//! CLI-specific wiring
//!
//! Builds a [`Highlighter`] from the configuration and the grammar files named on the command
//! line, then renders a source file with it. Errors come back as display strings; `main` prints
//! them and exits.

use std::path::Path;
use tinct_config::TinctConfig;
use tinct_core::formats::HtmlOptions;
use tinct_core::grammar::LanguageDef;
use tinct_core::{Highlighter, TokenizeOptions};

/// A highlighter with every grammar file loaded, in order
pub struct Session {
    pub highlighter: Highlighter,
    /// Id of the last grammar file loaded
    pub last_language: Option<String>,
}

/// Load grammar files into a highlighter configured from `config`
pub fn build_session<P: AsRef<Path>>(config: &TinctConfig, grammars: &[P]) -> Result<Session, String> {
    let mut highlighter = Highlighter::new()
        .with_options(TokenizeOptions::from(&config.tokenizer))
        .with_html_options(HtmlOptions::from(&config.html));

    let mut last_language = None;
    for path in grammars {
        let path = path.as_ref();
        let def = LanguageDef::from_path(path).map_err(|e| e.to_string())?;
        highlighter
            .registry_mut()
            .load_language(&def)
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        tracing::debug!(language = def.id.as_str(), path = %path.display(), "loaded grammar file");
        last_language = Some(def.id);
    }

    Ok(Session {
        highlighter,
        last_language,
    })
}

impl Session {
    /// Render `source` as `format`, in `language` or else the last loaded language
    pub fn render(&self, source: &str, language: Option<&str>, format: &str) -> Result<String, String> {
        let language = language
            .or(self.last_language.as_deref())
            .ok_or_else(|| "No language given and no grammar loaded".to_string())?;

        if !self.highlighter.formats().has(format) {
            return Err(format!(
                "Unknown format '{}'. Available formats: {}",
                format,
                self.highlighter.formats().list_formats().join(", ")
            ));
        }

        self.highlighter
            .render(source, language, format)
            .map_err(|e| e.to_string())
    }

    /// `name - description` lines for every registered format
    pub fn format_listing(&self) -> Vec<String> {
        let formats = self.highlighter.formats();
        formats
            .list_formats()
            .into_iter()
            .filter_map(|name| {
                let format = formats.get(&name).ok()?;
                Some(format!("{} - {}", name, format.description()))
            })
            .collect()
    }

    /// Loaded languages, with their aliases in brackets
    pub fn language_listing(&self) -> Vec<String> {
        let registry = self.highlighter.registry();
        let aliases = registry.aliases();
        registry
            .languages()
            .into_iter()
            .map(|language| {
                let names: Vec<&str> = aliases
                    .iter()
                    .filter(|(_, target)| *target == language)
                    .map(|(alias, _)| *alias)
                    .collect();
                if names.is_empty() {
                    language.to_string()
                } else {
                    format!("{} [{}]", language, names.join(", "))
                }
            })
            .collect()
    }
}
