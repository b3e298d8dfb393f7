//! Serializers over token trees
//!
//! Every format takes the token sequence of one highlight cycle plus the language name and the
//! hook registry (the HTML format runs `wrap` callbacks per token), and returns a string.
//!
//! | name   | output                                          |
//! |--------|-------------------------------------------------|
//! | html   | `<span class="token TYPE ALIAS...">` markup     |
//! | json   | the token tree as pretty-printed JSON           |
//! | tree   | indented debug listing                          |
//! | text   | the source text again                           |

pub mod format;
pub mod html;
pub mod json;
pub mod registry;
pub mod text;
pub mod tree;

pub use format::Format;
pub use html::{strip_markup, HtmlFormat, HtmlOptions};
pub use json::JsonFormat;
pub use registry::FormatRegistry;
pub use text::TextFormat;
pub use tree::TreeFormat;
