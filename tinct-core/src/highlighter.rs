//! The highlighter facade
//!
//!     A [`Highlighter`] owns everything one highlight cycle needs: the grammar registry, the
//!     hook registry, the output formats and the tokenizer options. Nothing is global; two
//!     highlighters never share state.
//!
//! One Cycle
//!
//!     env = { code, language, grammar: registry[language] }
//!     run before-tokenize(env)
//!     env.tokens = tokenize(env.code, env.grammar)
//!     run after-tokenize(env)
//!     run before-stringify(env)
//!     env.output = format.serialize(env.tokens)
//!     run after-stringify(env)
//!     return env.output

use crate::error::HighlightError;
use crate::formats::{FormatRegistry, HtmlFormat, HtmlOptions};
use crate::grammar::Grammar;
use crate::hooks::{Hook, HookEnv, HookRegistry};
use crate::registry::Registry;
use crate::token::Token;
use crate::tokenizing::{TokenizeOptions, Tokenizer};
use std::sync::Arc;

pub struct Highlighter {
    registry: Registry,
    hooks: HookRegistry,
    formats: FormatRegistry,
    options: TokenizeOptions,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// An empty registry, no hooks and the built-in formats
    pub fn new() -> Self {
        Self::with_registry(Registry::new())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            hooks: HookRegistry::new(),
            formats: FormatRegistry::with_defaults(),
            options: TokenizeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TokenizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the `html` format with one using `options`
    pub fn with_html_options(mut self, options: HtmlOptions) -> Self {
        self.formats.register(HtmlFormat::new(options));
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    pub fn formats_mut(&mut self) -> &mut FormatRegistry {
        &mut self.formats
    }

    pub fn options(&self) -> TokenizeOptions {
        self.options
    }

    /// The registered grammar for a language or alias
    pub fn grammar(&self, language: &str) -> Result<Arc<Grammar>, HighlightError> {
        self.registry
            .get(language)
            .ok_or_else(|| HighlightError::UnknownLanguage(language.to_string()))
    }

    /// Tokenize `code` with a registered language, without running hooks
    pub fn tokenize(&self, code: &str, language: &str) -> Result<Vec<Token>, HighlightError> {
        let grammar = self.grammar(language)?;
        Ok(self.tokenize_grammar(code, &grammar))
    }

    /// Tokenize `code` with any grammar; named references resolve through this registry
    pub fn tokenize_grammar(&self, code: &str, grammar: &Grammar) -> Vec<Token> {
        Tokenizer::new(&self.registry)
            .with_options(self.options)
            .tokenize(code, grammar)
    }

    /// Write tokens as HTML, running the wrap callbacks
    pub fn stringify(&self, tokens: &[Token], language: &str) -> Result<String, HighlightError> {
        Ok(self.formats.serialize(tokens, language, "html", &self.hooks)?)
    }

    /// Run a full highlight cycle and serialize with the named format
    pub fn render(&self, code: &str, language: &str, format: &str) -> Result<String, HighlightError> {
        tracing::debug!(language, format, bytes = code.len(), "render");

        let mut env = HookEnv::new(code, language);
        env.grammar = self.registry.get(language);
        self.run_hook(Hook::BeforeTokenize, &mut env)?;

        let grammar = match env.grammar.clone() {
            Some(grammar) => grammar,
            None => self.grammar(&env.language)?,
        };
        env.tokens = self.tokenize_grammar(&env.code, &grammar);
        self.run_hook(Hook::AfterTokenize, &mut env)?;

        self.run_hook(Hook::BeforeStringify, &mut env)?;
        env.output = self
            .formats
            .serialize(&env.tokens, &env.language, format, &self.hooks)?;
        self.run_hook(Hook::AfterStringify, &mut env)?;

        Ok(env.output)
    }

    /// [`render`](Self::render) as HTML
    pub fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError> {
        self.render(code, language, "html")
    }

    fn run_hook(&self, hook: Hook, env: &mut HookEnv) -> Result<(), HighlightError> {
        self.hooks
            .run(&hook, env)
            .map_err(|source| HighlightError::Hook {
                hook: hook.name().to_string(),
                source,
            })
    }
}
