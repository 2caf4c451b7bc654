//! Runtime errors and non-local control flow signals.

use ember_lex::Token;
use thiserror::Error;

use crate::value::Value;

/// Fatal runtime errors. The first one aborts execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Line {line}. Cannot get undefined variable '{name}'.")]
    UndefinedVariable { name: String, line: u32 },

    #[error("Line {line}. Cannot set undefined variable '{name}'.")]
    UndefinedVariableSet { name: String, line: u32 },

    /// Undefined name lookup with no token in scope (e.g. `self` during
    /// `super` resolution).
    #[error("Cannot get undefined variable '{name}'.")]
    UndefinedName { name: String },

    #[error("Line {line}. Incompatible operands for the '{op}' operator.")]
    IncompatibleOperands { op: String, line: u32 },

    #[error("Line {line}. Incompatible operand for the '{op}' operator.")]
    IncompatibleOperand { op: String, line: u32 },

    #[error("Line {line}. Object is not callable.")]
    NotCallable { line: u32 },

    #[error("Line {line}. Invalid number of arguments.")]
    ArityMismatch { line: u32 },

    #[error("Line {line}. Cannot get undefined attribute '{name}'.")]
    UndefinedAttribute { name: String, line: u32 },

    #[error("Line {line}. Cannot set undefined attribute '{name}'.")]
    UndefinedAttributeSet { name: String, line: u32 },

    #[error("Line {line}. Invalid attribute '{name}', not an instance object.")]
    NotAnInstance { name: String, line: u32 },

    #[error("Line {line}. Invalid superclass name '{name}'.")]
    InvalidSuperclass { name: String, line: u32 },

    #[error("Line {line}. Invalid superclass method name '{name}'.")]
    UndefinedSuperMethod { name: String, line: u32 },

    #[error("The $main() function does not accept arguments.")]
    MainArity,

    #[error("The $main entry point is not callable.")]
    MainNotCallable,

    #[error("Line {line}. 'break' outside of a loop.")]
    BreakOutsideLoop { line: u32 },

    #[error("Line {line}. 'continue' outside of a loop.")]
    ContinueOutsideLoop { line: u32 },

    #[error("Line {line}. 'return' outside of a function.")]
    ReturnOutsideFunction { line: u32 },

    #[error("Failed to write output: {message}")]
    Io { message: String },
}

/// Non-local control flow, carried through the evaluator's `Result`
/// channel as tagged unwinding.
///
/// `Break`, `Continue`, and `Return` are not errors: they cross
/// arbitrarily many evaluator frames and are consumed by the innermost
/// enclosing loop (or, for `Return`, the innermost call frame). A signal
/// that reaches the top level is converted into a [`RuntimeError`].
#[derive(Debug, Clone)]
pub enum Signal {
    /// `break`: exits the innermost enclosing loop.
    Break(Token),

    /// `continue`: skips to the next loop iteration. In a `for` loop the
    /// increment expression still runs before the next condition check.
    Continue(Token),

    /// `return`: yields a value from the innermost call frame.
    Return { keyword: Token, value: Value },

    /// A runtime error unwinding to the top.
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(error: RuntimeError) -> Self {
        Signal::Error(error)
    }
}
