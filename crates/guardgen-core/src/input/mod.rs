//! Source parsers.
//!
//! Each parser reads declarations from source text into IR
//! [`Declaration`](crate::ir::Declaration)s.

#[cfg(feature = "input-typescript")]
pub mod typescript;

#[cfg(feature = "input-typescript")]
pub use typescript::parse_typescript_declarations;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("tree-sitter init: {0}")]
    Language(String),
    #[error("failed to parse TypeScript")]
    Parse,
    #[error("{kind} declaration missing {field}")]
    Malformed {
        kind: &'static str,
        field: &'static str,
    },
}
