//! Parser utility functions.

use jackc_ast::syntax_kind::{Keyword, TokenKind};
use jackc_scanner::Token;

/// Check if a token can start a statement.
pub fn can_start_statement(token: &Token) -> bool {
    matches!(
        token.keyword(),
        Some(Keyword::Let | Keyword::If | Keyword::While | Keyword::Do | Keyword::Return)
    )
}

/// Check if a token can start a type.
pub fn can_start_type(token: &Token) -> bool {
    token.kind == TokenKind::Identifier
        || matches!(
            token.keyword(),
            Some(Keyword::Int | Keyword::Char | Keyword::Boolean)
        )
}

pub fn is_class_var_start(token: &Token) -> bool {
    matches!(token.keyword(), Some(Keyword::Static | Keyword::Field))
}

pub fn is_subroutine_start(token: &Token) -> bool {
    matches!(
        token.keyword(),
        Some(Keyword::Constructor | Keyword::Function | Keyword::Method)
    )
}

/// Check if a token can start a term.
pub fn can_start_term(token: &Token) -> bool {
    match token.kind {
        TokenKind::IntegerConstant | TokenKind::StringConstant | TokenKind::Identifier => true,
        TokenKind::Keyword => matches!(
            token.keyword(),
            Some(Keyword::True | Keyword::False | Keyword::Null | Keyword::This)
        ),
        TokenKind::Symbol => matches!(token.symbol(), Some('(' | '-' | '~')),
    }
}
