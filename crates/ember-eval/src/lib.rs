//! ember-eval - Tree-walking evaluator for the Ember language.
//!
//! ============================================================================
//! EVALUATION
//! ============================================================================
//!
//! The evaluator is the final phase of the pipeline:
//!
//! ```text
//! (Parser) ──▶ AST ──▶ [Evaluator] ──▶ Side effects, then $main
//! ```
//!
//! It walks the AST produced by `ember-par` against a chain of lexical
//! scopes, supporting first-class functions with closures,
//! single-inheritance classes with bound methods, and non-local control
//! flow (`break`/`continue`/`return`) as tagged unwinding.
//!
//! Scopes live in an arena owned by the [`Interpreter`]; values reference
//! scopes by index, so class/closure/environment cycles cannot leak. The
//! arena is released with the interpreter.
//!
//! # Example
//!
//! ```
//! use ember_lex::Lexer;
//! use ember_par::Parser;
//! use ember_eval::Interpreter;
//!
//! let tokens = Lexer::new("var x = 40 + 2;").tokenize().unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//! let mut interp = Interpreter::new();
//! interp.run(&program).unwrap();
//! assert_eq!(interp.global("x").unwrap().to_string(), "42");
//! ```

mod builtins;
mod env;
mod error;
mod interp;
mod object;
mod value;


pub use builtins::{Builtin, BUILTINS};
pub use env::{EnvArena, EnvId, Scope};
pub use error::{RuntimeError, Signal};
pub use interp::Interpreter;
pub use object::{ClassInfo, Function, Instance};
pub use value::Value;
