//! ember-drv - Driver for the Ember interpreter.
//!
//! ============================================================================
//! DRIVER OVERVIEW
//! ============================================================================
//!
//! The driver is the entry point and orchestrator for the whole
//! interpretation pipeline. It is responsible for:
//!
//! 1. COMMAND LINE PARSING
//!    - Parse the subcommand and flags
//!    - Validate the source path argument
//!
//! 2. SOURCE LOADING
//!    - Read the source file, or stdin when no path is given
//!
//! 3. PIPELINE ORCHESTRATION
//!    - Run the phases in order
//!    - Stop early for the debug subcommands
//!
//! 4. ERROR REPORTING
//!    - Format the diagnostic from whichever phase failed
//!    - Exit with the appropriate code
//!
//! ============================================================================
//! INTERPRETATION PIPELINE
//! ============================================================================
//!
//! ```text
//! Source (file or stdin)
//!        │
//!        ▼
//!   [Scanner] ──▶ Token Stream ──▶ debug_tokens prints tokens and stops
//!        │
//!        ▼
//!   [Parser] ──▶ AST ──▶ debug_expr parses one expression and stops
//!        │
//!        ▼
//!   [Evaluator] ──▶ Side effects (echo, builtins), then $main
//! ```
//!
//! Phase 1: Scanning
//! - Input: Source text
//! - Output: Token stream
//! - Tool: ember-lex
//! - Errors: unexpected characters, unterminated strings
//!
//! Phase 2: Parsing
//! - Input: Token stream
//! - Output: Abstract Syntax Tree (AST)
//! - Tool: ember-par
//! - Errors: syntax errors, invalid constructs
//!
//! Phase 3: Evaluation
//! - Input: AST
//! - Output: Program side effects
//! - Tool: ember-eval
//! - Errors: undefined names, invalid operands, arity mismatches
//!
//! ============================================================================
//! ERROR HANDLING
//! ============================================================================
//!
//! On any scanner, parser, or runtime error the process prints a single
//! diagnostic line (`Syntax Error: …` or `Runtime Error: …`) on stderr
//! and exits with a non-zero status. Errors are fatal at the first
//! diagnostic; no phase attempts recovery.
//!
//! Exit Codes:
//! -----------
//! - 0: Success
//! - 1: Any error (diagnostic, I/O, or invalid arguments)

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use ember_eval::Interpreter;
use ember_lex::Lexer;
use ember_par::Parser;

const USAGE: &str = "\
Usage: ember [path]
       ember debug_tokens [path]
       ember debug_expr [path]

Reads source from stdin when no path is given.

Subcommands:
  debug_tokens  Print the token stream, one token per line
  debug_expr    Parse a single expression and print its pretty form

Options:
      --verbose  Report pipeline progress on stderr
  -h, --help     Print this help
      --version  Print version";

/// What the invocation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Scan, parse, and run the program.
    Run,
    /// Scan only; print each token.
    DebugTokens,
    /// Scan, then parse a single expression and print it.
    DebugExpr,
    /// Print usage.
    Help,
    /// Print the version.
    Version,
}

/// Driver configuration parsed from the command line. No environment
/// variables or configuration files are consulted.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,
    /// Source path; stdin when absent.
    pub input: Option<PathBuf>,
    pub verbose: bool,
}

impl Config {
    /// Parses the arguments after the program name.
    pub fn from_args(args: impl Iterator<Item = String>) -> Result<Self> {
        let mut command = None;
        let mut input = None;
        let mut verbose = false;

        for arg in args {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Self::bare(Command::Help)),
                "--version" => return Ok(Self::bare(Command::Version)),
                "--verbose" => verbose = true,
                "debug_tokens" if command.is_none() && input.is_none() => {
                    command = Some(Command::DebugTokens);
                }
                "debug_expr" if command.is_none() && input.is_none() => {
                    command = Some(Command::DebugExpr);
                }
                flag if flag.starts_with('-') => {
                    bail!("Unknown option '{flag}'.\n{USAGE}");
                }
                path => {
                    if input.replace(PathBuf::from(path)).is_some() {
                        bail!("Expected at most one source path.\n{USAGE}");
                    }
                }
            }
        }

        Ok(Self {
            command: command.unwrap_or(Command::Run),
            input,
            verbose,
        })
    }

    fn bare(command: Command) -> Self {
        Self {
            command,
            input: None,
            verbose: false,
        }
    }
}

/// One driver invocation.
pub struct Session {
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the configured command to completion.
    pub fn run(&self) -> Result<()> {
        match self.config.command {
            Command::Help => {
                println!("{USAGE}");
                Ok(())
            }
            Command::Version => {
                println!("ember {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            Command::DebugTokens => self.debug_tokens(),
            Command::DebugExpr => self.debug_expr(),
            Command::Run => self.run_program(),
        }
    }

    fn read_source(&self) -> Result<String> {
        match &self.config.input {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read source file '{}'", path.display())),
            None => {
                let mut source = String::new();
                std::io::stdin()
                    .read_to_string(&mut source)
                    .context("Failed to read source from stdin")?;
                Ok(source)
            }
        }
    }

    fn scan(&self, source: &str) -> Result<Vec<ember_lex::Token>> {
        if self.config.verbose {
            eprintln!("Scanning {} bytes", source.len());
        }
        Lexer::new(source)
            .tokenize()
            .map_err(|e| anyhow!("Syntax Error: {e}"))
    }

    fn debug_tokens(&self) -> Result<()> {
        let source = self.read_source()?;
        for token in self.scan(&source)? {
            println!("{token}");
        }
        Ok(())
    }

    fn debug_expr(&self) -> Result<()> {
        let source = self.read_source()?;
        let tokens = self.scan(&source)?;
        let expr = Parser::new(tokens)
            .parse_expression()
            .map_err(|e| anyhow!("Syntax Error: {e}"))?;
        println!("{expr}");
        Ok(())
    }

    fn run_program(&self) -> Result<()> {
        let source = self.read_source()?;
        let tokens = self.scan(&source)?;
        let program = Parser::new(tokens)
            .parse()
            .map_err(|e| anyhow!("Syntax Error: {e}"))?;
        if self.config.verbose {
            eprintln!("Parsed {} top-level statements", program.len());
        }
        Interpreter::new()
            .run(&program)
            .map_err(|e| anyhow!("Runtime Error: {e}"))
    }
}

/// Entry point used by the `ember` binary.
pub fn main() -> Result<()> {
    let config = Config::from_args(std::env::args().skip(1))?;
    Session::new(config).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Result<Config> {
        Config::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_default_command_is_run() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.command, Command::Run);
        assert!(cfg.input.is_none());
        assert!(!cfg.verbose);
    }

    #[test]
    fn test_path_argument() {
        let cfg = config(&["script.em"]).unwrap();
        assert_eq!(cfg.command, Command::Run);
        assert_eq!(cfg.input.unwrap(), PathBuf::from("script.em"));
    }

    #[test]
    fn test_subcommand_with_path() {
        let cfg = config(&["debug_tokens", "script.em"]).unwrap();
        assert_eq!(cfg.command, Command::DebugTokens);
        assert_eq!(cfg.input.unwrap(), PathBuf::from("script.em"));
    }

    #[test]
    fn test_subcommand_name_after_path_is_a_path() {
        // Only the first positional argument can select a subcommand.
        let err = config(&["script.em", "debug_expr"]).unwrap_err();
        assert!(err.to_string().contains("at most one source path"));
    }

    #[test]
    fn test_verbose_flag() {
        let cfg = config(&["--verbose", "debug_expr"]).unwrap();
        assert!(cfg.verbose);
        assert_eq!(cfg.command, Command::DebugExpr);
    }

    #[test]
    fn test_unknown_option() {
        let err = config(&["--frobnicate"]).unwrap_err();
        assert!(err.to_string().contains("Unknown option '--frobnicate'"));
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(config(&["--help"]).unwrap().command, Command::Help);
        assert_eq!(config(&["--version"]).unwrap().command, Command::Version);
    }
}
