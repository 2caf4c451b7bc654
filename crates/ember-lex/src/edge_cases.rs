//! Edge case and property tests for the scanner.

use proptest::prelude::*;

use crate::{Lexer, Token, TokenKind};

fn lex_all(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize().expect("tokenize failed")
}

// ==================== EDGE CASES ====================

#[test]
fn test_edge_only_whitespace() {
    let tokens = lex_all(" \t\r\n \n");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(tokens[0].line, 3);
}

#[test]
fn test_edge_long_identifier() {
    let name = "a".repeat(10_000);
    let tokens = lex_all(&name);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].lexeme, name);
}

#[test]
fn test_edge_long_number() {
    let digits = "9".repeat(400);
    let tokens = lex_all(&digits);
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].lexeme, digits);
}

#[test]
fn test_edge_empty_string_literal() {
    let tokens = lex_all("\"\"");
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].lexeme, "\"\"");
}

#[test]
fn test_edge_adjacent_tokens_no_whitespace() {
    let tokens = lex_all("a(b)c");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::Identifier,
            TokenKind::LeftParen,
            TokenKind::Identifier,
            TokenKind::RightParen,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_edge_dollar_only_identifier() {
    let tokens = lex_all("$");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].lexeme, "$");
}

#[test]
fn test_edge_number_then_method_call_shape() {
    // "1.x" scans as NUMBER DOT IDENTIFIER since 'x' is not a digit.
    let tokens = lex_all("1.x");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::Number,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_edge_comment_does_not_eat_newline() {
    let tokens = lex_all("# note\nx");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].line, 2);
}

#[test]
fn test_edge_string_spanning_many_lines() {
    let tokens = lex_all("\"a\nb\nc\nd\" x");
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[1].lexeme, "x");
    assert_eq!(tokens[1].line, 4);
}

// ==================== PROPERTIES ====================

const OPERATOR_LEXEMES: &[&str] = &[
    "(", ")", "{", "}", ",", ";", "+", "-", "*", "/", "==", "!=", "<=", ">=", "+=", "-=",
];

/// Strategy for a single valid lexeme (no whitespace, comments, or
/// characters that could merge with a neighbor across a separator).
fn lexeme_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Identifiers (may collide with keywords, which is fine: the
        // lexeme is still reproduced verbatim).
        "[a-z_$][a-z0-9_$]{0,10}",
        // Numbers
        "[0-9]{1,6}",
        "[0-9]{1,4}\\.[0-9]{1,4}",
        // Strings without quotes or backslash surprises
        "\"[ a-z0-9+*-]{0,10}\"",
        // Operators and punctuation
        prop::sample::select(OPERATOR_LEXEMES).prop_map(str::to_string),
    ]
}

proptest! {
    /// Scanner totality: any whitespace-separated sequence of valid
    /// lexemes scans without error, reproduces every lexeme verbatim and
    /// in order, and ends with exactly one EOF token.
    #[test]
    fn prop_lexemes_reconstitute(
        lexemes in prop::collection::vec(lexeme_strategy(), 0..40),
        seps in prop::collection::vec("[ \t\n]{1,3}", 0..40),
    ) {
        let mut source = String::new();
        for (i, lexeme) in lexemes.iter().enumerate() {
            source.push_str(lexeme);
            let sep = seps.get(i).map(String::as_str).unwrap_or(" ");
            source.push_str(sep);
        }

        let tokens = Lexer::new(&source).tokenize().unwrap();

        let scanned: Vec<&str> =
            tokens[..tokens.len() - 1].iter().map(|t| t.lexeme.as_str()).collect();
        prop_assert_eq!(scanned, lexemes.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        prop_assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(),
            1
        );
    }

    /// Line numbers are 1-based and equal to one plus the number of
    /// newlines preceding the token's first character.
    #[test]
    fn prop_line_tracking(newlines in 0u32..50, trailing in "[a-z]{1,5}") {
        let source = format!("{}{}", "\n".repeat(newlines as usize), trailing);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        prop_assert_eq!(tokens[0].line, newlines + 1);
    }

    /// Scanning is deterministic: the same source always yields the same
    /// token sequence.
    #[test]
    fn prop_deterministic(source in "[ -~\n]{0,80}") {
        let first = Lexer::new(&source).tokenize();
        let second = Lexer::new(&source).tokenize();
        prop_assert_eq!(first, second);
    }
}
