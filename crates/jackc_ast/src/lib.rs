//! jackc_ast: Syntax tree definitions for the jackc compiler.
//!
//! This module defines token categories, reserved words, grammar tags, the
//! owned syntax tree the parser builds and the symbol annotations it leaves
//! on every identifier usage.

pub mod node;
pub mod syntax_kind;
pub mod types;

// Re-export key types
pub use node::*;
pub use syntax_kind::{Keyword, SyntaxKind, TokenKind};
pub use types::*;
