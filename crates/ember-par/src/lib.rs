//! ember-par - Recursive-descent parser for the Ember language.
//!
//! ============================================================================
//! PARSING
//! ============================================================================
//!
//! The parser is the second phase of the pipeline:
//!
//! ```text
//! (Scanner) ──▶ Token Stream ──▶ [Parser] ──▶ AST ──▶ (Evaluator)
//! ```
//!
//! It turns the scanner's token sequence into an AST: an ordered list of
//! top-level statements. Parsing is a pure function of the token
//! sequence, and errors are fatal at the first diagnostic; there is no
//! synchronization or recovery.
//!
//! Grammar areas are split across impl blocks:
//! - `stmt.rs` - declarations and statements
//! - `expr.rs` - the expression precedence ladder
//! - `ast.rs` - the node definitions both produce
//!
//! # Example
//!
//! ```
//! use ember_lex::Lexer;
//! use ember_par::Parser;
//!
//! let tokens = Lexer::new("echo 1 + 2;").tokenize().unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//! assert_eq!(program.len(), 1);
//! ```

pub mod ast;
mod error;
mod expr;
mod stmt;

pub use ast::{Expr, Stmt};
pub use error::ParseError;

use ember_lex::{Token, TokenKind};

/// Recursive-descent parser over a scanned token sequence.
///
/// The token vector must be terminated by an `EOF` token, which the
/// scanner guarantees.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Creates a parser for the given token sequence.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parses a whole program: declarations and statements until EOF.
    pub fn parse(mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.declaration()?);
        }
        Ok(statements)
    }

    /// Parses a single expression. Used by the `debug_expr` subcommand;
    /// trailing tokens are not consumed.
    pub fn parse_expression(mut self) -> Result<Expr, ParseError> {
        self.expression()
    }

    // ----------------------------------------------------------------------
    // Helpers
    // ----------------------------------------------------------------------

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Consumes the current token if it has the given kind.
    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it has any of the given kinds.
    pub(crate) fn match_any(&mut self, kinds: &[TokenKind]) -> bool {
        for &kind in kinds {
            if self.check(kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    /// Consumes a token of the given kind or fails with `message`.
    pub(crate) fn consume(
        &mut self,
        kind: TokenKind,
        message: &str,
    ) -> Result<Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        Err(self.error(message))
    }

    /// An error positioned at the current token.
    pub(crate) fn error(&self, message: &str) -> ParseError {
        self.error_at(self.peek(), message)
    }

    /// An error positioned at a specific token.
    pub(crate) fn error_at(&self, token: &Token, message: &str) -> ParseError {
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEof {
                message: message.to_string(),
            }
        } else {
            ParseError::UnexpectedToken {
                message: message.to_string(),
                line: token.line,
                lexeme: token.lexeme.clone(),
            }
        }
    }
}
