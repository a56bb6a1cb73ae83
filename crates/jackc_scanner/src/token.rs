//! Tokens produced by the scanner.

use jackc_ast::syntax_kind::{Keyword, TokenKind};
use jackc_core::text::TextRange;
use std::str::FromStr;

/// A scanned token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The lexical category of the token.
    pub kind: TokenKind,
    /// The literal value. String constants hold their content without the
    /// surrounding quotes.
    pub text: String,
    /// Position in the source text.
    pub range: TextRange,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, range: TextRange) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
        }
    }

    /// The reserved word this token spells, if it is a keyword.
    pub fn keyword(&self) -> Option<Keyword> {
        if self.kind == TokenKind::Keyword {
            Keyword::from_str(&self.text).ok()
        } else {
            None
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }

    /// The character of a symbol token.
    pub fn symbol(&self) -> Option<char> {
        if self.kind == TokenKind::Symbol {
            self.text.chars().next()
        } else {
            None
        }
    }

    pub fn is_symbol(&self, ch: char) -> bool {
        self.symbol() == Some(ch)
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }
}
