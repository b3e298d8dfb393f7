//! Rules and rule sets
//!
//! A [`Rule`] is one matching directive: a pattern plus flags, an alias list, and an optional
//! nested grammar used to tokenize whatever the rule matched. A token name in a grammar maps to a
//! [`RuleSet`], either a single rule or an ordered list of alternatives.

use super::model::Grammar;
use super::pattern::Pattern;
use crate::error::GrammarError;
use std::sync::Arc;

/// Reference to the grammar used for a rule's `inside` tokenization
#[derive(Debug, Clone, PartialEq)]
pub enum GrammarRef {
    /// A grammar owned by the rule
    Inline(Arc<Grammar>),
    /// A grammar looked up in the registry when tokenizing
    Named(String),
    /// The grammar currently being applied
    SelfRef,
}

impl GrammarRef {
    pub fn inline(grammar: Grammar) -> Self {
        GrammarRef::Inline(Arc::new(grammar))
    }

    pub fn named(name: impl Into<String>) -> Self {
        GrammarRef::Named(name.into())
    }

    /// Copy the reference, cloning inline grammars instead of sharing them
    pub fn deep_clone(&self) -> Self {
        match self {
            GrammarRef::Inline(grammar) => GrammarRef::Inline(Arc::new(grammar.deep_clone())),
            other => other.clone(),
        }
    }
}

/// A single pattern-matching directive
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub pattern: Pattern,
    pub lookbehind: bool,
    pub greedy: bool,
    pub alias: Vec<String>,
    pub inside: Option<GrammarRef>,
}

impl Rule {
    /// Compile a plain case-sensitive rule
    pub fn new(pattern: &str) -> Result<Self, GrammarError> {
        Ok(Self::from_pattern(Pattern::new(pattern)?))
    }

    /// Compile a rule that matches regardless of case
    pub fn case_insensitive(pattern: &str) -> Result<Self, GrammarError> {
        Ok(Self::from_pattern(Pattern::case_insensitive(pattern)?))
    }

    pub fn from_pattern(pattern: Pattern) -> Self {
        Self {
            pattern,
            lookbehind: false,
            greedy: false,
            alias: Vec::new(),
            inside: None,
        }
    }

    pub fn lookbehind(mut self) -> Self {
        self.lookbehind = true;
        self
    }

    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    /// Append an alias name
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias.push(alias.into());
        self
    }

    pub fn inside(mut self, grammar: GrammarRef) -> Self {
        self.inside = Some(grammar);
        self
    }

    pub fn deep_clone(&self) -> Self {
        Self {
            inside: self.inside.as_ref().map(GrammarRef::deep_clone),
            ..self.clone()
        }
    }
}

/// What a token name maps to: one rule or an ordered list of alternatives
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSet {
    Single(Rule),
    Alternatives(Vec<Rule>),
}

impl RuleSet {
    /// Rules in priority order
    pub fn rules(&self) -> &[Rule] {
        match self {
            RuleSet::Single(rule) => std::slice::from_ref(rule),
            RuleSet::Alternatives(rules) => rules,
        }
    }

    pub fn rules_mut(&mut self) -> &mut [Rule] {
        match self {
            RuleSet::Single(rule) => std::slice::from_mut(rule),
            RuleSet::Alternatives(rules) => rules,
        }
    }

    pub fn deep_clone(&self) -> Self {
        match self {
            RuleSet::Single(rule) => RuleSet::Single(rule.deep_clone()),
            RuleSet::Alternatives(rules) => {
                RuleSet::Alternatives(rules.iter().map(Rule::deep_clone).collect())
            }
        }
    }
}

impl From<Rule> for RuleSet {
    fn from(rule: Rule) -> Self {
        RuleSet::Single(rule)
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        RuleSet::Alternatives(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_builder_flags() {
        let rule = Rule::new(r"(^|\s)x")
            .unwrap()
            .lookbehind()
            .greedy()
            .alias("a")
            .alias("b")
            .inside(GrammarRef::SelfRef);
        assert!(rule.lookbehind);
        assert!(rule.greedy);
        assert_eq!(rule.alias, vec!["a", "b"]);
        assert_eq!(rule.inside, Some(GrammarRef::SelfRef));
    }

    #[test]
    fn test_rule_set_order() {
        let set = RuleSet::from(vec![Rule::new("a").unwrap(), Rule::new("b").unwrap()]);
        let sources: Vec<_> = set.rules().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(sources, vec!["a", "b"]);

        let single = RuleSet::from(Rule::new("c").unwrap());
        assert_eq!(single.rules().len(), 1);
    }

    #[test]
    fn test_deep_clone_does_not_share_inline_grammar() {
        let mut inner = Grammar::new();
        inner.push("digit", Rule::new(r"\d").unwrap());
        let rule = Rule::new(".+")
            .unwrap()
            .inside(GrammarRef::inline(inner));

        let copy = rule.deep_clone();
        match (&rule.inside, &copy.inside) {
            (Some(GrammarRef::Inline(a)), Some(GrammarRef::Inline(b))) => {
                assert!(!Arc::ptr_eq(a, b));
                assert_eq!(a, b);
            }
            _ => panic!("Expected inline grammars"),
        }
    }
}
