//! Scanner error types.

use thiserror::Error;

/// Fatal scanner errors. Tokenization stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that starts no token.
    #[error("Line {line}. Unexpected character '{ch}'.")]
    UnexpectedCharacter { ch: char, line: u32 },

    /// A string literal whose closing quote is missing. The line is the
    /// one the opening quote appeared on.
    #[error("Unterminated string, opened in line {line}.")]
    UnterminatedString { line: u32 },
}
