//! Testing utilities
//!
//!     Helpers shared by the unit tests, the integration tests under `tests/` and downstream
//!     crates that ship grammars:
//!
//!         factories          short constructors for expected token trees
//!         summary            one line per top-level token, for compact assertions
//!         assert_round_trip  the leaf-text invariant, with a readable failure message
//!         workspace_path     paths to the shared grammar fixtures
//!
//!     ```rust,ignore
//!     use tinct_core::testing::{assert_round_trip, summary};
//!
//!     let tokens = tokenize("ab12cd", &grammar);
//!     assert_round_trip("ab12cd", &tokens);
//!     assert_eq!(summary(&tokens), vec![r#"word "ab""#, r#"number "12""#, r#"word "cd""#]);
//!     ```

use crate::token::{detokenize, Token};
use std::path::{Path, PathBuf};

pub mod factories {
    use crate::token::{Content, Token};

    /// A plain text leaf
    pub fn text(text: &str) -> Token {
        Token::Text(text.to_string())
    }

    /// A typed token holding a string
    pub fn leaf(kind: &str, text: &str) -> Token {
        Token::typed(kind, Content::Text(text.to_string()), Vec::new())
    }

    /// A typed token holding a string, with aliases
    pub fn aliased(kind: &str, text: &str, aliases: &[&str]) -> Token {
        Token::typed(
            kind,
            Content::Text(text.to_string()),
            aliases.iter().map(|a| a.to_string()).collect(),
        )
    }

    /// A typed token holding nested tokens
    pub fn node(kind: &str, children: Vec<Token>) -> Token {
        Token::typed(kind, Content::Tokens(children), Vec::new())
    }
}

/// Describe each top-level token as `kind "text"`, or `"text"` for plain text
pub fn summary(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| match token.kind() {
            Some(kind) => format!("{} {:?}", kind, token.text()),
            None => format!("{:?}", token.text()),
        })
        .collect()
}

/// Assert that the leaf text of `tokens` concatenates to `source`
pub fn assert_round_trip(source: &str, tokens: &[Token]) {
    let rebuilt = detokenize(tokens);
    assert_eq!(
        rebuilt, source,
        "leaf text does not reproduce the input\n  input:  {:?}\n  leaves: {:?}",
        source, rebuilt
    );
}

/// Get a path relative to the workspace root.
///
/// `CARGO_MANIFEST_DIR` points to the crate directory, the shared fixtures live one level up.
///
/// ```rust,ignore
/// let path = workspace_path("fixtures/grammars/mini.yaml");
/// let def = LanguageDef::from_path(path)?;
/// ```
pub fn workspace_path(relative_path: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .unwrap_or(manifest_dir)
        .join(relative_path)
}
