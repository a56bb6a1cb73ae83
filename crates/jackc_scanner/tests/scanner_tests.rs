//! Scanner integration tests.
//!
//! Verifies that the scanner correctly tokenizes Jack source text.

use jackc_ast::syntax_kind::TokenKind;
use jackc_diagnostics::LexError;
use jackc_scanner::tokenize;

/// Helper: scan all tokens from source and return as (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .map(|t| (t.kind, t.text))
        .collect()
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<TokenKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
}

#[test]
fn test_whitespace_only() {
    assert!(scan_all("   \n\t  \r\n").is_empty());
}

#[test]
fn test_comments_only() {
    let src = "// line comment\n/* block\n comment */\n/** doc */";
    assert!(scan_all(src).is_empty());
}

#[test]
fn test_line_comment_at_end_of_input() {
    let tokens = scan_all("return; // trailing");
    assert_eq!(tokens.len(), 2);
}

#[test]
fn test_keyword_vs_identifier() {
    let tokens = scan_all("class classy Class");
    assert_eq!(
        tokens,
        vec![
            (TokenKind::Keyword, "class".to_string()),
            (TokenKind::Identifier, "classy".to_string()),
            (TokenKind::Identifier, "Class".to_string()),
        ]
    );
}

#[test]
fn test_identifier_with_underscore_and_digits() {
    let tokens = scan_all("_tmp x1 a_b_2");
    assert!(tokens.iter().all(|(k, _)| *k == TokenKind::Identifier));
    assert_eq!(tokens[2].1, "a_b_2");
}

#[test]
fn test_symbols_are_single_characters() {
    let kinds = scan_kinds("a<=b");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Symbol,
            TokenKind::Symbol,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn test_integer_constants() {
    let tokens = scan_all("0 7 32767");
    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|(k, _)| *k == TokenKind::IntegerConstant));
    assert_eq!(tokens[2].1, "32767");
}

#[test]
fn test_integer_out_of_range() {
    let err = tokenize("let x = 32768;").unwrap_err();
    assert!(matches!(err, LexError::IntegerOutOfRange { ref text, .. } if text == "32768"));
    assert!(matches!(
        tokenize("99999999999999999999").unwrap_err(),
        LexError::IntegerOutOfRange { .. }
    ));
}

#[test]
fn test_string_constant_strips_quotes() {
    let tokens = scan_all("\"Hello, world!\"");
    assert_eq!(
        tokens,
        vec![(TokenKind::StringConstant, "Hello, world!".to_string())]
    );
}

#[test]
fn test_comment_markers_inside_string() {
    let tokens = scan_all("\"a // b /* c\"");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].1, "a // b /* c");
}

#[test]
fn test_empty_string_constant() {
    let tokens = scan_all("\"\"");
    assert_eq!(tokens, vec![(TokenKind::StringConstant, String::new())]);
}

#[test]
fn test_unterminated_string() {
    assert!(matches!(
        tokenize("\"abc").unwrap_err(),
        LexError::UnterminatedString { .. }
    ));
    assert!(matches!(
        tokenize("\"abc\ndef\"").unwrap_err(),
        LexError::UnterminatedString { .. }
    ));
}

#[test]
fn test_unterminated_block_comment() {
    let err = tokenize("class A { /* never closed").unwrap_err();
    assert!(matches!(err, LexError::UnterminatedComment { .. }));
    assert_eq!(err.span().pos, 10);
}

#[test]
fn test_unexpected_character() {
    let err = tokenize("let x = 1 ! 2;").unwrap_err();
    assert!(matches!(err, LexError::UnexpectedCharacter { ch: '!', .. }));
    assert_eq!(err.span().pos, 10);
}

#[test]
fn test_small_class() {
    let src = r#"
        class Main {
            function void main() {
                do Output.printInt(1 + 2);
                return;
            }
        }
    "#;
    let tokens = scan_all(src);
    assert_eq!(tokens.len(), 23);
    assert_eq!(tokens[0], (TokenKind::Keyword, "class".to_string()));
    assert_eq!(tokens[11], (TokenKind::Symbol, ".".to_string()));
    assert_eq!(tokens.last().map(|t| t.1.as_str()), Some("}"));
}
