//! Unit-level error reporting.

use jackc_core::text::{LineAndColumn, LineMap};
use jackc_diagnostics::CompileError;
use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use std::fmt;
use thiserror::Error;

/// A compile failure tied to the unit it happened in.
#[derive(Debug, Error)]
#[error("{unit}{}: {error}", location_suffix(.location))]
pub struct UnitError {
    /// Name the unit was added under.
    pub unit: String,
    /// 1-based position of the failure when the error carries a range.
    pub location: Option<LineAndColumn>,
    pub error: CompileError,
    source_code: NamedSource<String>,
}

impl UnitError {
    pub fn new(unit: &str, text: &str, error: CompileError) -> Self {
        let location = error
            .span()
            .map(|span| LineMap::new(text).line_and_column_of(span.pos));
        Self {
            unit: unit.to_string(),
            location,
            error,
            source_code: NamedSource::new(unit, text.to_string()),
        }
    }

    /// Stable diagnostic code, e.g. `jackc::parse`.
    pub fn code_str(&self) -> String {
        format!("jackc::{}", self.error.kind_name())
    }

    fn label(&self) -> String {
        match &self.error {
            CompileError::Lex(_) => "not a valid token".to_string(),
            CompileError::Parse(err) => format!("expected {}", err.expected),
            CompileError::DuplicateSymbol(_) => "declared again here".to_string(),
            CompileError::UnresolvedOperator(err) => format!("`{}` has no lowering", err.operator),
            CompileError::CodeGenAssertion(_) => "cannot be lowered".to_string(),
        }
    }
}

fn location_suffix(location: &Option<LineAndColumn>) -> String {
    match location {
        Some(location) => format!(":{location}"),
        None => String::new(),
    }
}

impl Diagnostic for UnitError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source_code)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.error.span()?;
        let span: SourceSpan = (span.pos as usize, span.len() as usize).into();
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.label()),
            span,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jackc_core::text::TextRange;
    use jackc_diagnostics::{CodeGenAssertionError, DuplicateSymbolError};

    #[test]
    fn test_location_in_message() {
        let text = "class A {\n  field int x, x;\n}";
        let err = UnitError::new(
            "A.jack",
            text,
            DuplicateSymbolError {
                name: "x".to_string(),
                span: TextRange::new(25, 26),
            }
            .into(),
        );
        assert_eq!(err.location, Some(LineAndColumn::new(1, 15)));
        assert_eq!(
            err.to_string(),
            "A.jack:2:16: `x` is already defined in this scope"
        );
        assert_eq!(err.code_str(), "jackc::duplicate_symbol");
        assert_eq!(err.labels().map(|labels| labels.count()), Some(1));
    }

    #[test]
    fn test_error_without_span() {
        let err = UnitError::new(
            "B.jack",
            "",
            CodeGenAssertionError::new("bad shape", None).into(),
        );
        assert_eq!(err.location, None);
        assert_eq!(err.to_string(), "B.jack: bad shape");
        assert!(err.labels().is_none());
    }
}
