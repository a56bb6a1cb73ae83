//! The scanner.
//!
//! Walks the unit text once, left to right, without backtracking. Token
//! ranges are byte offsets into the original text.

use crate::char_codes::*;
use crate::token::Token;
use jackc_ast::syntax_kind::{is_symbol_char, Keyword, TokenKind};
use jackc_core::text::{TextPos, TextRange};
use jackc_diagnostics::LexError;
use std::str::FromStr;

/// Tokenize a whole unit. The first lexical error aborts the unit.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    let mut scanner = Scanner::new(text);
    let mut tokens = Vec::new();
    while let Some(token) = scanner.scan()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// The scanner converts unit text into tokens.
pub struct Scanner<'a> {
    /// The source text being scanned.
    text: &'a str,
    /// Current byte position in the text.
    pos: usize,
    /// Start of the current token (after leading trivia).
    token_start: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source text.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            token_start: 0,
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Look at the character at the current position without advancing.
    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// Look at the character following the current one.
    #[inline]
    fn peek_char(&self) -> Option<char> {
        let mut chars = self.text[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advance past the current character.
    #[inline]
    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn range_from(&self, start: usize) -> TextRange {
        TextRange::new(start as TextPos, self.pos as TextPos)
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == SLASH && self.peek_char() == Some(SLASH) {
                // Line comment
                while let Some(c) = self.current_char() {
                    if is_line_break(c) {
                        break;
                    }
                    self.advance();
                }
            } else if ch == SLASH && self.peek_char() == Some(ASTERISK) {
                // Block comment
                let start = self.pos;
                self.pos += 2;
                match self.text[self.pos..].find("*/") {
                    Some(offset) => self.pos += offset + 2,
                    None => {
                        self.pos = self.text.len();
                        return Err(LexError::UnterminatedComment {
                            span: self.range_from(start),
                        });
                    }
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Scan the next token, or `None` at the end of the text.
    pub fn scan(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_trivia()?;
        self.token_start = self.pos;

        let ch = match self.current_char() {
            Some(ch) => ch,
            None => return Ok(None),
        };

        let token = if is_identifier_start(ch) {
            self.scan_identifier()
        } else if is_digit(ch) {
            self.scan_integer()?
        } else if ch == DOUBLE_QUOTE {
            self.scan_string()?
        } else if is_symbol_char(ch) {
            self.advance();
            Token::new(TokenKind::Symbol, ch.to_string(), self.range_from(self.token_start))
        } else {
            self.advance();
            return Err(LexError::UnexpectedCharacter {
                ch,
                span: self.range_from(self.token_start),
            });
        };

        Ok(Some(token))
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if !is_identifier_part(c) {
                break;
            }
            self.advance();
        }
        let text = &self.text[start..self.pos];

        let kind = if Keyword::from_str(text).is_ok() {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, text, self.range_from(start))
    }

    fn scan_integer(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if !is_digit(c) {
                break;
            }
            self.advance();
        }
        let text = &self.text[start..self.pos];
        let span = self.range_from(start);

        // Digit runs of any length are valid tokens; only the value is bounded.
        let in_range = text
            .parse::<u32>()
            .map(|value| value <= MAX_INTEGER_CONSTANT)
            .unwrap_or(false);
        if !in_range {
            return Err(LexError::IntegerOutOfRange {
                text: text.to_string(),
                span,
            });
        }

        Ok(Token::new(TokenKind::IntegerConstant, text, span))
    }

    fn scan_string(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        self.advance(); // skip opening quote
        let content_start = self.pos;
        loop {
            match self.current_char() {
                Some(DOUBLE_QUOTE) => break,
                Some(c) if !is_line_break(c) => self.advance(),
                _ => {
                    return Err(LexError::UnterminatedString {
                        span: self.range_from(start),
                    })
                }
            }
        }
        let content = &self.text[content_start..self.pos];
        self.advance(); // skip closing quote
        Ok(Token::new(TokenKind::StringConstant, content, self.range_from(start)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_simple_tokens() {
        let mut scanner = Scanner::new("( ) { } [ ] ; , .");
        let mut symbols = String::new();
        while let Some(token) = scanner.scan().unwrap() {
            assert_eq!(token.kind, TokenKind::Symbol);
            symbols.push_str(&token.text);
        }
        assert_eq!(symbols, "(){}[];,.");
        assert_eq!(scanner.scan().unwrap(), None);
    }

    #[test]
    fn test_scan_identifier_and_keyword() {
        let mut scanner = Scanner::new("let x = 42;");
        let let_kw = scanner.scan().unwrap().unwrap();
        assert_eq!(let_kw.keyword(), Some(Keyword::Let));
        let ident = scanner.scan().unwrap().unwrap();
        assert_eq!(ident.kind, TokenKind::Identifier);
        assert_eq!(ident.text, "x");
        assert_eq!(ident.range, TextRange::new(4, 5));
        assert!(scanner.scan().unwrap().unwrap().is_symbol('='));
        let number = scanner.scan().unwrap().unwrap();
        assert_eq!(number.kind, TokenKind::IntegerConstant);
        assert_eq!(number.text, "42");
        assert!(scanner.scan().unwrap().unwrap().is_symbol(';'));
        assert_eq!(scanner.scan().unwrap(), None);
    }

    #[test]
    fn test_string_range_includes_quotes() {
        let mut scanner = Scanner::new("  \"hi there\"");
        let token = scanner.scan().unwrap().unwrap();
        assert_eq!(token.text, "hi there");
        assert_eq!(token.range, TextRange::new(2, 12));
        assert_eq!(scanner.scan().unwrap(), None);
    }
}
