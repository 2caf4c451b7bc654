//! Parser error types.

use thiserror::Error;

/// Fatal parser errors. Parsing stops at the first one; there is no
/// synchronization or recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The current token cannot appear here.
    #[error("Line {line}, at token '{lexeme}'. {message}")]
    UnexpectedToken {
        message: String,
        line: u32,
        lexeme: String,
    },

    /// Input ended where more tokens were required.
    #[error("At EOF. {message}")]
    UnexpectedEof { message: String },
}
