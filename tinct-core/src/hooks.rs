//! Lifecycle hooks
//!
//!     A [`HookRegistry`] is an ordered multimap from hook point to callbacks. The
//!     [`Highlighter`](crate::Highlighter) fires four points around one highlight cycle:
//!
//!         before-tokenize   may rewrite `code`, `language` or `grammar`
//!         after-tokenize    may rewrite `tokens`
//!         before-stringify  may rewrite `tokens`
//!         after-stringify   may rewrite `output`
//!
//!     Plugins can define their own points with [`Hook::Custom`] and fire them with
//!     [`HookRegistry::run`]. The HTML format additionally runs `wrap` callbacks once per typed
//!     token, on a [`WrapEnv`] describing the element about to be written.
//!
//!     Callbacks run synchronously in registration order. The first error stops the run and is
//!     returned to the caller.

use crate::error::HookError;
use crate::grammar::Grammar;
use crate::token::Token;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A hook point
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeTokenize,
    AfterTokenize,
    BeforeStringify,
    AfterStringify,
    Custom(String),
}

impl Hook {
    pub fn name(&self) -> &str {
        match self {
            Hook::BeforeTokenize => "before-tokenize",
            Hook::AfterTokenize => "after-tokenize",
            Hook::BeforeStringify => "before-stringify",
            Hook::AfterStringify => "after-stringify",
            Hook::Custom(name) => name,
        }
    }

    /// The hook point for a name; unknown names are custom points
    pub fn from_name(name: &str) -> Self {
        match name {
            "before-tokenize" => Hook::BeforeTokenize,
            "after-tokenize" => Hook::AfterTokenize,
            "before-stringify" => Hook::BeforeStringify,
            "after-stringify" => Hook::AfterStringify,
            other => Hook::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State shared by the callbacks of one highlight cycle
#[derive(Debug, Clone, Default)]
pub struct HookEnv {
    pub code: String,
    pub language: String,
    /// Grammar used for tokenizing; resolved from `language` when left empty
    pub grammar: Option<Arc<Grammar>>,
    pub tokens: Vec<Token>,
    pub output: String,
    /// Free-form values for plugins to pass data between hook points
    pub vars: HashMap<String, serde_json::Value>,
}

impl HookEnv {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            ..Self::default()
        }
    }
}

/// The element about to be written for one typed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapEnv {
    /// Token type
    pub kind: String,
    /// Already rendered (escaped) inner HTML
    pub content: String,
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub language: String,
}

pub type HookFn = Box<dyn Fn(&mut HookEnv) -> Result<(), HookError> + Send + Sync>;
pub type WrapFn = Box<dyn Fn(&mut WrapEnv) -> Result<(), HookError> + Send + Sync>;

/// Handle for removing a registered callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

#[derive(Default)]
pub struct HookRegistry {
    next_id: u64,
    hooks: HashMap<Hook, Vec<(HookId, HookFn)>>,
    wrap: Vec<(HookId, WrapFn)>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback to a hook point
    pub fn add<F>(&mut self, hook: Hook, callback: F) -> HookId
    where
        F: Fn(&mut HookEnv) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.hooks
            .entry(hook)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Append a per-token wrap callback
    pub fn add_wrap<F>(&mut self, callback: F) -> HookId
    where
        F: Fn(&mut WrapEnv) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.wrap.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback; `false` if the id is not registered
    pub fn remove(&mut self, id: HookId) -> bool {
        for callbacks in self.hooks.values_mut() {
            if let Some(index) = callbacks.iter().position(|(cid, _)| *cid == id) {
                drop(callbacks.remove(index));
                return true;
            }
        }
        if let Some(index) = self.wrap.iter().position(|(cid, _)| *cid == id) {
            drop(self.wrap.remove(index));
            return true;
        }
        false
    }

    /// Run every callback of `hook` in registration order
    pub fn run(&self, hook: &Hook, env: &mut HookEnv) -> Result<(), HookError> {
        let Some(callbacks) = self.hooks.get(hook) else {
            return Ok(());
        };
        for (_, callback) in callbacks {
            callback(env)?;
        }
        Ok(())
    }

    /// Run every wrap callback in registration order
    pub fn run_wrap(&self, env: &mut WrapEnv) -> Result<(), HookError> {
        for (_, callback) in &self.wrap {
            callback(env)?;
        }
        Ok(())
    }

    /// Number of callbacks registered for `hook`
    pub fn count(&self, hook: &Hook) -> usize {
        self.hooks.get(hook).map_or(0, Vec::len)
    }

    pub fn wrap_count(&self) -> usize {
        self.wrap.len()
    }

    fn next_id(&mut self) -> HookId {
        self.next_id += 1;
        HookId(self.next_id)
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<(&str, usize)> = self
            .hooks
            .iter()
            .map(|(hook, callbacks)| (hook.name(), callbacks.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("HookRegistry")
            .field("hooks", &counts)
            .field("wrap", &self.wrap.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append(tag: &'static str) -> impl Fn(&mut HookEnv) -> Result<(), HookError> {
        move |env: &mut HookEnv| {
            env.output.push_str(tag);
            Ok(())
        }
    }

    #[test]
    fn test_hook_names_round_trip() {
        for hook in [
            Hook::BeforeTokenize,
            Hook::AfterTokenize,
            Hook::BeforeStringify,
            Hook::AfterStringify,
            Hook::Custom("complete".to_string()),
        ] {
            assert_eq!(Hook::from_name(hook.name()), hook);
        }
    }

    #[test]
    fn test_callbacks_run_in_order() {
        let mut hooks = HookRegistry::new();
        hooks.add(Hook::AfterStringify, append("a"));
        hooks.add(Hook::AfterStringify, append("b"));
        hooks.add(Hook::BeforeTokenize, append("x"));

        let mut env = HookEnv::new("code", "lang");
        hooks.run(&Hook::AfterStringify, &mut env).unwrap();
        assert_eq!(env.output, "ab");
        assert_eq!(hooks.count(&Hook::AfterStringify), 2);
    }

    #[test]
    fn test_run_without_callbacks_is_noop() {
        let hooks = HookRegistry::new();
        let mut env = HookEnv::new("code", "lang");
        assert!(hooks.run(&Hook::Custom("nothing".into()), &mut env).is_ok());
        assert_eq!(env.code, "code");
    }

    #[test]
    fn test_remove() {
        let mut hooks = HookRegistry::new();
        let first = hooks.add(Hook::AfterStringify, append("a"));
        hooks.add(Hook::AfterStringify, append("b"));

        assert!(hooks.remove(first));
        assert!(!hooks.remove(first));

        let mut env = HookEnv::default();
        hooks.run(&Hook::AfterStringify, &mut env).unwrap();
        assert_eq!(env.output, "b");
    }

    #[test]
    fn test_error_stops_run() {
        let mut hooks = HookRegistry::new();
        hooks.add(Hook::AfterTokenize, append("a"));
        hooks.add(Hook::AfterTokenize, |_: &mut HookEnv| Err(HookError::new("boom")));
        hooks.add(Hook::AfterTokenize, append("c"));

        let mut env = HookEnv::default();
        let result = hooks.run(&Hook::AfterTokenize, &mut env);
        assert_eq!(result, Err(HookError::new("boom")));
        assert_eq!(env.output, "a");
    }

    #[test]
    fn test_wrap_callbacks() {
        let mut hooks = HookRegistry::new();
        let id = hooks.add_wrap(|env: &mut WrapEnv| {
            env.classes.push(format!("lang-{}", env.language));
            Ok(())
        });

        let mut env = WrapEnv {
            kind: "keyword".into(),
            content: "if".into(),
            tag: "span".into(),
            classes: vec!["token".into(), "keyword".into()],
            attributes: Vec::new(),
            language: "mini".into(),
        };
        hooks.run_wrap(&mut env).unwrap();
        assert_eq!(env.classes, vec!["token", "keyword", "lang-mini"]);

        assert_eq!(hooks.wrap_count(), 1);
        assert!(hooks.remove(id));
        assert_eq!(hooks.wrap_count(), 0);
    }
}
