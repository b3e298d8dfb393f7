//! Declarative grammar files
//!
//!     Grammars are data. This module reads them from YAML or JSON into plain serde structs
//!     ([`LanguageDef`], [`GrammarDef`]) and compiles those into [`Grammar`] values. Map order in
//!     the file is priority order, so grammar maps are read through a visitor that keeps entries
//!     in document order instead of going through a hash map.
//!
//! File Shape
//!
//!     id: mini
//!     aliases: [mn]
//!     extends: base
//!     grammar:
//!       comment: { pattern: '//.*', greedy: true }
//!       keyword: '\b(?:if|else)\b'
//!       string:
//!         - { pattern: '"[^"]*"', inside: self }
//!         - "'[^']*'"
//!       $rest: other
//!     insert_before:
//!       - language: markup
//!         anchor: comment
//!         tokens: { ... }
//!
//!     A rule is a bare pattern string, a rule object, or a list of either. `inside` is `self`,
//!     a language name, or a nested grammar map.

use super::model::Grammar;
use super::pattern::Pattern;
use super::rule::{GrammarRef, Rule, RuleSet};
use crate::error::GrammarError;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Reserved grammar key holding the rest reference
pub const REST_KEY: &str = "$rest";

/// Keyword selecting the enclosing grammar in `inside`
pub const SELF_KEYWORD: &str = "self";

/// One language as described in a grammar file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageDef {
    pub id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Registered language whose grammar this one extends
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub grammar: GrammarDef,
    #[serde(default)]
    pub insert_before: Vec<InsertionDef>,
}

/// A splice of tokens into a registered grammar
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InsertionDef {
    /// Target language; the language being defined when absent
    #[serde(default)]
    pub language: Option<String>,
    pub anchor: String,
    pub tokens: GrammarDef,
}

/// An ordered grammar map as read from a file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrammarDef {
    pub entries: Vec<(String, RuleSetDef)>,
    pub rest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RuleSetDef {
    Single(RuleDef),
    Alternatives(Vec<RuleDef>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RuleDef {
    Pattern(String),
    Full(RuleObjectDef),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleObjectDef {
    pub pattern: String,
    #[serde(default)]
    pub lookbehind: bool,
    #[serde(default)]
    pub greedy: bool,
    #[serde(default, alias = "nocase")]
    pub case_insensitive: bool,
    #[serde(default)]
    pub alias: AliasDef,
    #[serde(default)]
    pub inside: Option<InsideDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AliasDef {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InsideDef {
    Name(String),
    Grammar(GrammarDef),
}

impl<'de> Deserialize<'de> for GrammarDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedEntries;

        impl<'de> Visitor<'de> for OrderedEntries {
            type Value = GrammarDef;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of token names to rules")
            }

            fn visit_map<A>(self, mut map: A) -> Result<GrammarDef, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut def = GrammarDef::default();
                while let Some(key) = map.next_key::<String>()? {
                    if key == REST_KEY {
                        def.rest = Some(map.next_value()?);
                    } else {
                        def.entries.push((key, map.next_value()?));
                    }
                }
                Ok(def)
            }
        }

        deserializer.deserialize_map(OrderedEntries)
    }
}

impl GrammarDef {
    /// Compile every pattern and build the grammar
    pub fn build(&self) -> Result<Grammar, GrammarError> {
        let mut grammar = Grammar::new();
        for (name, rules) in &self.entries {
            grammar.push(name.clone(), rules.build()?);
        }
        grammar.set_rest(self.rest.as_ref().map(GrammarRef::named));
        Ok(grammar)
    }
}

impl RuleSetDef {
    pub fn build(&self) -> Result<RuleSet, GrammarError> {
        match self {
            RuleSetDef::Single(rule) => Ok(RuleSet::Single(rule.build()?)),
            RuleSetDef::Alternatives(rules) => Ok(RuleSet::Alternatives(
                rules.iter().map(RuleDef::build).collect::<Result<_, _>>()?,
            )),
        }
    }
}

impl RuleDef {
    pub fn build(&self) -> Result<Rule, GrammarError> {
        let def = match self {
            RuleDef::Pattern(pattern) => return Rule::new(pattern),
            RuleDef::Full(def) => def,
        };

        let pattern = if def.case_insensitive {
            Pattern::case_insensitive(&def.pattern)?
        } else {
            Pattern::new(&def.pattern)?
        };

        let inside = match &def.inside {
            None => None,
            Some(InsideDef::Name(name)) if name == SELF_KEYWORD => Some(GrammarRef::SelfRef),
            Some(InsideDef::Name(name)) => Some(GrammarRef::named(name.clone())),
            Some(InsideDef::Grammar(grammar)) => Some(GrammarRef::inline(grammar.build()?)),
        };

        Ok(Rule {
            pattern,
            lookbehind: def.lookbehind,
            greedy: def.greedy,
            alias: def.alias.names(),
            inside,
        })
    }
}

impl AliasDef {
    pub fn names(&self) -> Vec<String> {
        match self {
            AliasDef::None => Vec::new(),
            AliasDef::One(name) => vec![name.clone()],
            AliasDef::Many(names) => names.clone(),
        }
    }
}

impl LanguageDef {
    pub fn from_yaml_str(source: &str) -> Result<Self, GrammarError> {
        serde_yaml::from_str(source).map_err(|e| GrammarError::InvalidDefinition(e.to_string()))
    }

    pub fn from_json_str(source: &str) -> Result<Self, GrammarError> {
        serde_json::from_str(source).map_err(|e| GrammarError::InvalidDefinition(e.to_string()))
    }

    /// Read a grammar file, picking the parser from the extension (`.json` or `.yaml`/`.yml`)
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            GrammarError::InvalidDefinition(format!("{}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&source),
            other => Err(GrammarError::InvalidDefinition(format!(
                "{}: unsupported grammar file extension {:?}",
                path.display(),
                other.unwrap_or("")
            ))),
        }
    }
}
