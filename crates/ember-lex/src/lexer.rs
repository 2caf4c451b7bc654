//! Lexer for the Ember language.
//!
//! The lexer transforms source text into a vector of tokens terminated by
//! a single `EOF` token. It handles whitespace, `#` line comments,
//! identifiers, keywords, operators, and number and string literals.

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::{keyword_from_ident, Token, TokenKind};

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_alphanumeric(c: char) -> bool {
    is_digit(c) || is_alpha(c)
}

/// Single-pass scanner.
///
/// Each iteration records the start of the next token, consumes one
/// character, and dispatches on it. Lookahead is one character
/// (`match_char`), except for float fractions which peek two ahead.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,

    /// Accumulated tokens.
    tokens: Vec<Token>,

    /// Starting byte position of the current token.
    token_start: usize,

    /// Line number where the current token starts (1-based).
    token_start_line: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            tokens: Vec::new(),
            token_start: 0,
            token_start_line: 1,
        }
    }

    /// Consumes the whole source and returns the token sequence.
    ///
    /// The returned vector always ends with exactly one `EOF` token whose
    /// lexeme is empty.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered; no tokens are produced
    /// past it.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while !self.cursor.is_at_end() {
            self.token_start = self.cursor.position();
            self.token_start_line = self.cursor.line();
            self.read_next_token()?;
        }
        let line = self.cursor.line();
        self.tokens.push(Token::new(TokenKind::Eof, "", line));
        Ok(self.tokens)
    }

    fn read_next_token(&mut self) -> Result<(), LexError> {
        let c = self.cursor.current_char();
        self.cursor.advance();

        match c {
            // Single character tokens.
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),
            '/' => self.add_token(TokenKind::Slash),
            '?' => self.add_token(TokenKind::Question),
            ':' => self.add_token(TokenKind::Colon),

            // Single or double character tokens.
            '+' => {
                let kind = if self.cursor.match_char('=') {
                    TokenKind::PlusEqual
                } else {
                    TokenKind::Plus
                };
                self.add_token(kind);
            }
            '-' => {
                let kind = if self.cursor.match_char('=') {
                    TokenKind::MinusEqual
                } else {
                    TokenKind::Minus
                };
                self.add_token(kind);
            }
            '!' => {
                let kind = if self.cursor.match_char('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.cursor.match_char('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.cursor.match_char('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.cursor.match_char('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add_token(kind);
            }

            // Discard comments.
            '#' => {
                while self.cursor.current_char() != '\n' && !self.cursor.is_at_end() {
                    self.cursor.advance();
                }
            }

            // Discard whitespace; the cursor tracks newlines.
            ' ' | '\r' | '\t' | '\n' => {}

            '"' => self.read_string()?,

            c if is_digit(c) => self.read_number(),

            c if is_alpha(c) => self.read_identifier(),

            c => {
                return Err(LexError::UnexpectedCharacter {
                    ch: c,
                    line: self.token_start_line,
                })
            }
        }

        Ok(())
    }

    /// Reads a string literal. The opening quote has been consumed.
    ///
    /// Newlines are permitted inside strings; the token carries the line
    /// of the opening quote. No escape processing: a backslash is an
    /// ordinary character, so `"\n"` is a two-character string.
    fn read_string(&mut self) -> Result<(), LexError> {
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::UnterminatedString {
                    line: self.token_start_line,
                });
            }
            let c = self.cursor.current_char();
            self.cursor.advance();
            if c == '"' {
                break;
            }
        }
        self.add_token(TokenKind::String);
        Ok(())
    }

    /// Reads a number: one or more digits, optionally followed by `.` and
    /// one or more digits. No exponent form; the unary minus is a separate
    /// token.
    fn read_number(&mut self) {
        while is_digit(self.cursor.current_char()) {
            self.cursor.advance();
        }
        if self.cursor.current_char() == '.' && is_digit(self.cursor.peek_next()) {
            self.cursor.advance();
            while is_digit(self.cursor.current_char()) {
                self.cursor.advance();
            }
        }
        self.add_token(TokenKind::Number);
    }

    /// Reads an identifier or keyword.
    fn read_identifier(&mut self) {
        while is_alphanumeric(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_start);
        let kind = keyword_from_ident(text).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme = self.cursor.slice_from(self.token_start);
        self.tokens
            .push(Token::new(kind, lexeme, self.token_start_line));
    }
}
