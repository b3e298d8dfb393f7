//! Grammar registry
//!
//!     Languages are registered by name and shared as `Arc<Grammar>`. The registry changes only
//!     through explicit calls on `&mut Registry`; the tokenizer borrows it read-only through
//!     [`GrammarResolver`] to look up `Named` references at tokenize time.
//!
//!     Registration checks that every name the grammar refers to is already known, except the
//!     language's own name (a grammar may recurse into itself by name). Rebuilding a language
//!     (for example through [`Registry::insert_before`]) registers a modified copy; grammars
//!     already handed out keep their old content.

use crate::error::GrammarError;
use crate::grammar::{Grammar, LanguageDef};
use std::collections::HashMap;
use std::sync::Arc;

/// Lookup of grammars by name, as needed by the tokenizer
pub trait GrammarResolver {
    fn resolve(&self, name: &str) -> Option<Arc<Grammar>>;
}

/// Named grammars and their aliases
#[derive(Debug, Clone, Default)]
pub struct Registry {
    grammars: HashMap<String, Arc<Grammar>>,
    aliases: HashMap<String, String>,
}

/// Read-only view of the registry handed to [`Registry::register_with`] builder functions
pub struct GrammarBuilder<'r> {
    registry: &'r Registry,
    name: &'r str,
}

impl<'r> GrammarBuilder<'r> {
    /// Name of the language being built
    pub fn name(&self) -> &str {
        self.name
    }

    /// A registered grammar
    pub fn get(&self, name: &str) -> Result<Arc<Grammar>, GrammarError> {
        self.registry
            .get(name)
            .ok_or_else(|| GrammarError::UnknownGrammar(name.to_string()))
    }

    /// Deep copy of a registered grammar with `overrides` applied, see [`Grammar::extend`]
    pub fn extend(&self, base: &str, overrides: Grammar) -> Result<Grammar, GrammarError> {
        Ok(self.get(base)?.extend(overrides))
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `grammar` under `name`, replacing any previous grammar of that name
    pub fn register(&mut self, name: impl Into<String>, grammar: Grammar) -> Result<(), GrammarError> {
        let name = name.into();
        self.validate(&name, &grammar)?;

        tracing::debug!(language = name.as_str(), tokens = grammar.len(), "registered grammar");
        self.aliases.remove(&name);
        self.grammars.insert(name, Arc::new(grammar));
        Ok(())
    }

    /// Register the grammar returned by `build`, which may look up and extend registered grammars
    ///
    /// # Examples
    ///
    /// ```ignore
    /// registry.register_with("tsx", |builder| {
    ///     builder.extend("jsx", Grammar::new().with("keyword", Rule::new(r"\b(?:type|interface)\b")?))
    /// })?;
    /// ```
    pub fn register_with<F>(&mut self, name: impl Into<String>, build: F) -> Result<(), GrammarError>
    where
        F: FnOnce(&GrammarBuilder<'_>) -> Result<Grammar, GrammarError>,
    {
        let name = name.into();
        let grammar = build(&GrammarBuilder {
            registry: self,
            name: &name,
        })?;
        self.register(name, grammar)
    }

    /// Make `alias` resolve to the language registered as `target`
    pub fn register_alias(
        &mut self,
        alias: impl Into<String>,
        target: &str,
    ) -> Result<(), GrammarError> {
        let target = self
            .canonical_name(target)
            .ok_or_else(|| GrammarError::UnknownGrammar(target.to_string()))?
            .to_string();
        let alias = alias.into();
        if alias != target {
            self.aliases.insert(alias, target);
        }
        Ok(())
    }

    /// The registered grammar for a language name or alias
    pub fn get(&self, name: &str) -> Option<Arc<Grammar>> {
        let name = self.canonical_name(name)?;
        self.grammars.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.canonical_name(name).is_some()
    }

    /// The registered language a name or alias stands for
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.grammars.contains_key(name) {
            return Some(name);
        }
        self.aliases.get(name).map(String::as_str)
    }

    /// Registered language names, sorted
    pub fn languages(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.grammars.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered aliases with their target languages, sorted by alias
    pub fn aliases(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(alias, target)| (alias.as_str(), target.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Splice `insertions` before `anchor` in a registered language and re-register the result
    pub fn insert_before(
        &mut self,
        language: &str,
        anchor: &str,
        insertions: Grammar,
    ) -> Result<(), GrammarError> {
        let name = self
            .canonical_name(language)
            .ok_or_else(|| GrammarError::UnknownGrammar(language.to_string()))?
            .to_string();
        let mut grammar = self
            .grammars
            .get(&name)
            .map(|grammar| Grammar::clone(grammar))
            .ok_or_else(|| GrammarError::UnknownGrammar(name.clone()))?;

        grammar
            .insert_before(anchor, insertions)
            .map_err(|err| match err {
                GrammarError::UnknownToken { token, .. } => GrammarError::UnknownToken {
                    grammar: name.clone(),
                    token,
                },
                other => other,
            })?;

        self.register(name, grammar)
    }

    /// Build and register a language read from a grammar file
    ///
    /// The language's own grammar is built (and extended from its base, if any) and registered
    /// first, then its aliases, then its `insert_before` splices in file order. The load is
    /// applied to a copy and committed only when every step succeeds.
    pub fn load_language(&mut self, def: &LanguageDef) -> Result<(), GrammarError> {
        let mut staged = self.clone();

        let own = def.grammar.build()?;
        let grammar = match &def.extends {
            Some(base) => GrammarBuilder {
                registry: &staged,
                name: &def.id,
            }
            .extend(base, own)?,
            None => own,
        };
        staged.register(def.id.clone(), grammar)?;

        for alias in &def.aliases {
            staged.register_alias(alias.clone(), &def.id)?;
        }

        for insertion in &def.insert_before {
            let target = insertion.language.as_deref().unwrap_or(&def.id);
            staged.insert_before(target, &insertion.anchor, insertion.tokens.build()?)?;
        }

        *self = staged;
        Ok(())
    }

    fn validate(&self, name: &str, grammar: &Grammar) -> Result<(), GrammarError> {
        for reference in grammar.named_references() {
            if reference != name && !self.contains(&reference) {
                return Err(GrammarError::UnknownGrammar(reference));
            }
        }
        Ok(())
    }
}

impl GrammarResolver for Registry {
    fn resolve(&self, name: &str) -> Option<Arc<Grammar>> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{GrammarRef, Rule};
    use crate::token::Token;
    use crate::tokenizing::Tokenizer;

    fn rule(pattern: &str) -> Rule {
        Rule::new(pattern).unwrap()
    }

    fn base() -> Grammar {
        Grammar::new()
            .with("comment", rule("#.*"))
            .with("number", rule(r"\d+"))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = Registry::new();
        registry.register("base", base()).unwrap();

        assert!(registry.contains("base"));
        assert_eq!(registry.get("base").unwrap().names(), vec!["comment", "number"]);
        assert!(registry.get("other").is_none());
        assert_eq!(registry.languages(), vec!["base"]);
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let mut registry = Registry::new();
        let grammar = Grammar::new().with("tag", rule("<[^>]+>").inside(GrammarRef::named("html")));

        assert_eq!(
            registry.register("doc", grammar),
            Err(GrammarError::UnknownGrammar("html".to_string()))
        );
        assert!(!registry.contains("doc"));
    }

    #[test]
    fn test_own_name_reference_allowed() {
        let mut registry = Registry::new();
        let grammar = Grammar::new().with("block", rule(r"\[.*\]").inside(GrammarRef::named("nest")));
        assert!(registry.register("nest", grammar).is_ok());
    }

    #[test]
    fn test_aliases_resolve() {
        let mut registry = Registry::new();
        registry.register("javascript", base()).unwrap();
        registry.register_alias("js", "javascript").unwrap();

        assert_eq!(registry.canonical_name("js"), Some("javascript"));
        assert!(Arc::ptr_eq(
            &registry.get("js").unwrap(),
            &registry.get("javascript").unwrap()
        ));
        assert_eq!(registry.aliases(), vec![("js", "javascript")]);
        assert_eq!(
            registry.register_alias("ts", "typescript"),
            Err(GrammarError::UnknownGrammar("typescript".to_string()))
        );
    }

    #[test]
    fn test_register_with_extends() {
        let mut registry = Registry::new();
        registry.register("base", base()).unwrap();

        registry
            .register_with("derived", |builder| {
                assert_eq!(builder.name(), "derived");
                builder.extend("base", Grammar::new().with("word", rule("[a-z]+")))
            })
            .unwrap();

        assert_eq!(
            registry.get("derived").unwrap().names(),
            vec!["comment", "number", "word"]
        );
        assert_eq!(registry.get("base").unwrap().len(), 2);
    }

    #[test]
    fn test_register_with_unknown_base() {
        let mut registry = Registry::new();
        let result = registry.register_with("derived", |builder| builder.extend("missing", Grammar::new()));
        assert_eq!(result, Err(GrammarError::UnknownGrammar("missing".to_string())));
    }

    #[test]
    fn test_insert_before_reregisters_copy() {
        let mut registry = Registry::new();
        registry.register("base", base()).unwrap();
        let before = registry.get("base").unwrap();

        registry
            .insert_before("base", "number", Grammar::new().with("hex", rule("0x[0-9a-f]+")))
            .unwrap();

        assert_eq!(before.names(), vec!["comment", "number"]);
        assert_eq!(
            registry.get("base").unwrap().names(),
            vec!["comment", "hex", "number"]
        );
    }

    #[test]
    fn test_insert_before_unknown_anchor_names_language() {
        let mut registry = Registry::new();
        registry.register("base", base()).unwrap();

        let result = registry.insert_before("base", "string", Grammar::new());
        assert_eq!(
            result,
            Err(GrammarError::UnknownToken {
                grammar: "base".to_string(),
                token: "string".to_string(),
            })
        );
    }

    #[test]
    fn test_named_inside_resolves_at_tokenize_time() {
        let mut registry = Registry::new();
        registry
            .register("inner", Grammar::new().with("digit", rule(r"\d")))
            .unwrap();
        registry
            .register(
                "outer",
                Grammar::new().with("group", rule(r"\(\d+\)").inside(GrammarRef::named("inner"))),
            )
            .unwrap();

        let grammar = registry.get("outer").unwrap();
        let tokens = Tokenizer::new(&registry).tokenize("x(12)", &grammar);
        assert_eq!(tokens[0], Token::from("x"));

        let children = tokens[1].as_typed().unwrap().children().unwrap();
        let kinds: Vec<Option<&str>> = children.iter().map(Token::kind).collect();
        assert_eq!(kinds, vec![None, Some("digit"), Some("digit"), None]);
    }

    #[test]
    fn test_load_language_with_extends_and_insertions() {
        let mut registry = Registry::new();
        registry.register("base", base()).unwrap();

        let def = LanguageDef::from_yaml_str(
            r#"
id: mini
aliases: [mn]
extends: base
grammar:
  word: '[a-z]+'
insert_before:
  - anchor: number
    tokens:
      float: '\d+\.\d+'
  - language: base
    anchor: comment
    tokens:
      shebang: '^#!.*'
"#,
        )
        .unwrap();
        registry.load_language(&def).unwrap();

        assert_eq!(
            registry.get("mn").unwrap().names(),
            vec!["comment", "float", "number", "word"]
        );
        assert_eq!(
            registry.get("base").unwrap().names(),
            vec!["shebang", "comment", "number"]
        );
    }

    #[test]
    fn test_failed_load_leaves_registry_unchanged() {
        let mut registry = Registry::new();
        registry.register("base", base()).unwrap();

        let def = LanguageDef::from_yaml_str(
            r#"
id: broken
aliases: [br]
grammar:
  word: '[a-z]+'
insert_before:
  - language: base
    anchor: comment
    tokens:
      shebang: '^#!.*'
  - anchor: missing
    tokens:
      float: '\d+\.\d+'
"#,
        )
        .unwrap();

        let err = registry.load_language(&def).unwrap_err();
        assert_eq!(
            err,
            GrammarError::UnknownToken {
                grammar: "broken".to_string(),
                token: "missing".to_string(),
            }
        );
        assert!(!registry.contains("broken"));
        assert!(!registry.contains("br"));
        assert!(registry.aliases().is_empty());
        assert_eq!(registry.languages(), vec!["base"]);
        assert_eq!(registry.get("base").unwrap().names(), vec!["comment", "number"]);
    }
}
