//! jackc_options: Compiler configuration.
//!
//! Options are read from a JSON object with camelCase keys. Every key is
//! optional; accessors fall back to the defaults, which reproduce the plain
//! instruction stream with no comments.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options that change the emitted instruction stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Emit a `// <statement>` comment line before each statement.
    pub annotate_statements: Option<bool>,
    /// How `true` is pushed.
    pub true_encoding: Option<TrueEncoding>,
    /// Runtime routine `%` is lowered to, e.g. `Math.mod`.
    pub modulo_routine: Option<String>,
}

impl CompilerOptions {
    pub fn annotate_statements(&self) -> bool {
        self.annotate_statements.unwrap_or(false)
    }

    pub fn true_encoding(&self) -> TrueEncoding {
        self.true_encoding.unwrap_or_default()
    }

    /// `None` when `%` has no lowering.
    pub fn modulo_routine(&self) -> Option<&str> {
        self.modulo_routine.as_deref()
    }
}

/// Instruction pair used for the all-ones truth value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrueEncoding {
    /// `push constant 0`, `not`
    #[default]
    NotZero,
    /// `push constant 1`, `neg`
    NegateOne,
}

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse options from a JSON string.
pub fn parse_options(content: &str) -> Result<CompilerOptions, OptionsError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse options from a JSON file.
pub fn parse_options_file(path: impl AsRef<Path>) -> Result<CompilerOptions, OptionsError> {
    let content = std::fs::read_to_string(path)?;
    parse_options(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = parse_options("{}").unwrap();
        assert_eq!(options, CompilerOptions::default());
        assert!(!options.annotate_statements());
        assert_eq!(options.true_encoding(), TrueEncoding::NotZero);
        assert_eq!(options.modulo_routine(), None);
    }

    #[test]
    fn test_camel_case_keys() {
        let options = parse_options(
            r#"{ "annotateStatements": true, "trueEncoding": "negateOne", "moduloRoutine": "Math.mod" }"#,
        )
        .unwrap();
        assert!(options.annotate_statements());
        assert_eq!(options.true_encoding(), TrueEncoding::NegateOne);
        assert_eq!(options.modulo_routine(), Some("Math.mod"));
    }

    #[test]
    fn test_bad_encoding_is_rejected() {
        let err = parse_options(r#"{ "trueEncoding": "minusOne" }"#).unwrap_err();
        assert!(matches!(err, OptionsError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_options_file("/nonexistent/jackc.json").unwrap_err();
        assert!(matches!(err, OptionsError::Io(_)));
    }

    #[test]
    fn test_serialize_round_trip_keys() {
        let options = CompilerOptions {
            annotate_statements: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"annotateStatements\":true"));
    }
}
