//! ember-lex - Scanner for the Ember language.
//!
//! ============================================================================
//! SCANNING
//! ============================================================================
//!
//! The scanner is the first phase of the pipeline:
//!
//! ```text
//! Source Text ──▶ [Scanner] ──▶ Token Stream ──▶ (Parser)
//! ```
//!
//! It turns source text into a token sequence terminated by a single
//! `EOF` token. The scan is a single forward pass with one character of
//! lookahead (two for float fractions): each step records the token's
//! start position, consumes one character, and dispatches on it.
//!
//! Scanner errors are fatal: the first unexpected character or
//! unterminated string aborts tokenization with a [`LexError`] carrying
//! the source line.
//!
//! # Example
//!
//! ```
//! use ember_lex::{Lexer, TokenKind};
//!
//! let tokens = Lexer::new("var x = 1;").tokenize().unwrap();
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::Var,
//!         TokenKind::Identifier,
//!         TokenKind::Equal,
//!         TokenKind::Number,
//!         TokenKind::Semicolon,
//!         TokenKind::Eof,
//!     ]
//! );
//! ```

pub mod cursor;
mod error;
mod lexer;
mod token;

#[cfg(test)]
mod edge_cases;

pub use cursor::Cursor;
pub use error::LexError;
pub use lexer::Lexer;
pub use token::{keyword_from_ident, Token, TokenKind};
