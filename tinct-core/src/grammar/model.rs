//! The ordered grammar map
//!
//! Entry order is priority order. All reordering goes through explicit splice operations
//! ([`Grammar::extend`], [`Grammar::insert_before`]) rather than ad hoc removal and re-insertion.

use super::rule::{GrammarRef, Rule, RuleSet};
use crate::error::GrammarError;

/// Name reported for grammars that are not registered under a language
pub const ANONYMOUS: &str = "<anonymous>";

/// An ordered mapping from token-type name to rules
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grammar {
    entries: Vec<(String, RuleSet)>,
    rest: Option<GrammarRef>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grammar from `(name, rules)` pairs, keeping their order.
    ///
    /// A repeated name replaces the earlier entry in place.
    pub fn from_entries<I, N, R>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, R)>,
        N: Into<String>,
        R: Into<RuleSet>,
    {
        let mut grammar = Self::new();
        for (name, rules) in entries {
            grammar.push(name, rules);
        }
        grammar
    }

    /// Add an entry at the end, or replace a same-named entry in place
    pub fn push(&mut self, name: impl Into<String>, rules: impl Into<RuleSet>) {
        let name = name.into();
        let rules = rules.into();
        match self.position(&name) {
            Some(index) => self.entries[index].1 = rules,
            None => self.entries.push((name, rules)),
        }
    }

    /// Builder-style [`push`](Self::push)
    pub fn with(mut self, name: impl Into<String>, rules: impl Into<RuleSet>) -> Self {
        self.push(name, rules);
        self
    }

    /// Builder-style rest reference
    pub fn with_rest(mut self, rest: GrammarRef) -> Self {
        self.rest = Some(rest);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RuleSet> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RuleSet> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove an entry, returning its rules
    pub fn remove(&mut self, name: &str) -> Option<RuleSet> {
        let index = self.position(name)?;
        Some(self.entries.remove(index).1)
    }

    /// Entries in priority order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSet)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rest(&self) -> Option<&GrammarRef> {
        self.rest.as_ref()
    }

    pub fn set_rest(&mut self, rest: Option<GrammarRef>) {
        self.rest = rest;
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// Copy the grammar without sharing any nested inline grammar
    pub fn deep_clone(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(name, rules)| (name.clone(), rules.deep_clone()))
                .collect(),
            rest: self.rest.as_ref().map(GrammarRef::deep_clone),
        }
    }

    /// Derive a new grammar from this one.
    ///
    /// Entries of `overrides` replace same-named entries at their original position; new names
    /// are appended. The base is deep-copied first, so the result shares nothing with `self`.
    /// The base's rest reference is kept unless `overrides` brings its own.
    pub fn extend(&self, overrides: Grammar) -> Grammar {
        let mut grammar = self.deep_clone();
        let Grammar { entries, rest } = overrides;
        for (name, rules) in entries {
            grammar.push(name, rules);
        }
        if rest.is_some() {
            grammar.rest = rest;
        }
        grammar
    }

    /// Splice the entries of `insertions` immediately before `anchor`.
    ///
    /// All other entries keep their relative order. An entry of `self` whose name also appears
    /// in `insertions` is dropped from its old position, which is how "insert after X" is
    /// expressed: re-supply X as the first insertion. Fails without touching `self` when
    /// `anchor` is absent.
    pub fn insert_before(&mut self, anchor: &str, insertions: Grammar) -> Result<(), GrammarError> {
        if !self.contains(anchor) {
            return Err(GrammarError::UnknownToken {
                grammar: ANONYMOUS.to_string(),
                token: anchor.to_string(),
            });
        }

        let old = std::mem::take(&mut self.entries);
        let relocated: Vec<String> = insertions.entries.iter().map(|(n, _)| n.clone()).collect();
        let mut pending = Some(insertions.entries);
        let mut entries = Vec::with_capacity(old.len() + relocated.len());

        for (name, rules) in old {
            if name == anchor {
                if let Some(inserted) = pending.take() {
                    entries.extend(inserted);
                }
            }
            if !relocated.contains(&name) {
                entries.push((name, rules));
            }
        }

        self.entries = entries;
        Ok(())
    }

    /// Every `Named` reference reachable from this grammar, through inline grammars and rest
    pub fn named_references(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_named(&mut names);
        names
    }

    fn collect_named(&self, names: &mut Vec<String>) {
        let refs = self
            .entries
            .iter()
            .flat_map(|(_, rules)| rules.rules())
            .filter_map(|rule| rule.inside.as_ref())
            .chain(self.rest.as_ref());

        for reference in refs {
            match reference {
                GrammarRef::Named(name) => {
                    if !names.contains(name) {
                        names.push(name.clone());
                    }
                }
                GrammarRef::Inline(grammar) => grammar.collect_named(names),
                GrammarRef::SelfRef => {}
            }
        }
    }

    /// Mutable access to a rule by name and alternative index
    pub fn rule_mut(&mut self, name: &str, index: usize) -> Option<&mut Rule> {
        self.get_mut(name)?.rules_mut().get_mut(index)
    }
}
