//! jackc_diagnostics: Error kinds raised while compiling a unit.
//!
//! Every stage of the pipeline is fail-fast: the first error aborts the unit
//! and no partial output is produced. Each error carries the byte range it
//! was raised at so the driver can point at the offending source.

use jackc_core::text::TextRange;
use thiserror::Error;

/// The tokenizer met text it cannot turn into a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character `{ch}`")]
    UnexpectedCharacter { ch: char, span: TextRange },

    #[error("unterminated string constant")]
    UnterminatedString { span: TextRange },

    #[error("unterminated block comment")]
    UnterminatedComment { span: TextRange },

    #[error("integer constant `{text}` is larger than 32767")]
    IntegerOutOfRange { text: String, span: TextRange },
}

impl LexError {
    pub fn span(&self) -> TextRange {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedComment { span }
            | LexError::IntegerOutOfRange { span, .. } => *span,
        }
    }
}

/// The current token matches no alternative of the active grammar rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found `{found}` while parsing {rule} (near `{}`)", .context.join(" "))]
pub struct ParseError {
    /// Human readable description of what the rule wanted.
    pub expected: String,
    /// Text of the offending token, or `end of input`.
    pub found: String,
    /// Name of the grammar rule being parsed.
    pub rule: &'static str,
    pub span: TextRange,
    /// Texts of the tokens surrounding the offending one.
    pub context: Vec<String>,
}

/// A name was declared twice in the same scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{name}` is already defined in this scope")]
pub struct DuplicateSymbolError {
    pub name: String,
    pub span: TextRange,
}

/// An operator reached the generator without a lowering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no lowering is configured for operator `{operator}`")]
pub struct UnresolvedOperatorError {
    pub operator: char,
    pub span: TextRange,
}

/// The generator met a tree shape it cannot lower.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CodeGenAssertionError {
    pub message: String,
    pub span: Option<TextRange>,
}

impl CodeGenAssertionError {
    pub fn new(message: impl Into<String>, span: Option<TextRange>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// Any error that aborts the compilation of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    DuplicateSymbol(#[from] DuplicateSymbolError),

    #[error(transparent)]
    UnresolvedOperator(#[from] UnresolvedOperatorError),

    #[error(transparent)]
    CodeGenAssertion(#[from] CodeGenAssertionError),
}

impl CompileError {
    /// The byte range the error was raised at, if known.
    pub fn span(&self) -> Option<TextRange> {
        match self {
            CompileError::Lex(e) => Some(e.span()),
            CompileError::Parse(e) => Some(e.span),
            CompileError::DuplicateSymbol(e) => Some(e.span),
            CompileError::UnresolvedOperator(e) => Some(e.span),
            CompileError::CodeGenAssertion(e) => e.span,
        }
    }

    /// Short stable name of the error kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CompileError::Lex(_) => "lex",
            CompileError::Parse(_) => "parse",
            CompileError::DuplicateSymbol(_) => "duplicate_symbol",
            CompileError::UnresolvedOperator(_) => "unresolved_operator",
            CompileError::CodeGenAssertion(_) => "codegen",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = ParseError {
            expected: "`;`".to_string(),
            found: "}".to_string(),
            rule: "letStatement",
            span: TextRange::new(10, 11),
            context: vec!["x".into(), "=".into(), "1".into(), "}".into()],
        };
        assert_eq!(
            err.to_string(),
            "expected `;`, found `}` while parsing letStatement (near `x = 1 }`)"
        );
    }

    #[test]
    fn test_compile_error_span() {
        let err: CompileError = DuplicateSymbolError {
            name: "x".to_string(),
            span: TextRange::new(3, 4),
        }
        .into();
        assert_eq!(err.span(), Some(TextRange::new(3, 4)));
        assert_eq!(err.kind_name(), "duplicate_symbol");
        assert_eq!(err.to_string(), "`x` is already defined in this scope");

        let err: CompileError = CodeGenAssertionError::new("bad term", None).into();
        assert_eq!(err.span(), None);
    }
}
