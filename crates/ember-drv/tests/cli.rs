//! End-to-end CLI tests.
//!
//! These drive the `ember` binary the way a user would: source from a
//! file or stdin, the default run pipeline, and the `debug_tokens` /
//! `debug_expr` subcommands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Path to the fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn ember() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ember"))
}

/// Writes a throwaway source file and returns its handle.
fn source_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(source.as_bytes())
        .expect("Failed to write temp source");
    file
}

// =========================================================================
// RUN PIPELINE
// =========================================================================

#[test]
fn test_run_fib_fixture() {
    ember()
        .arg(fixtures_dir().join("fib.em"))
        .assert()
        .success()
        .stdout("55\n");
}

#[test]
fn test_run_inheritance_fixture() {
    ember()
        .arg(fixtures_dir().join("inheritance.em"))
        .assert()
        .success()
        .stdout("7\n8\n");
}

#[test]
fn test_run_entry_fixture() {
    ember()
        .arg(fixtures_dir().join("entry.em"))
        .assert()
        .success()
        .stdout("top level\nhello from $main\n");
}

#[test]
fn test_run_from_stdin() {
    ember()
        .write_stdin("var s = \"\"; for var i = 0; i < 3; i = i + 1 { s = s + $str(i); } echo s;")
        .assert()
        .success()
        .stdout("012\n");
}

#[test]
fn test_block_scoping() {
    let file = source_file("var x = 1; { var x = 2; echo x; } echo x;");
    ember()
        .arg(file.path())
        .assert()
        .success()
        .stdout("2\n1\n");
}

// =========================================================================
// DIAGNOSTICS AND EXIT CODES
// =========================================================================

#[test]
fn test_runtime_error_exits_nonzero() {
    let file = source_file("echo 1 + \"a\";");
    ember()
        .arg(file.path())
        .assert()
        .failure()
        .stderr("Runtime Error: Line 1. Incompatible operands for the '+' operator.\n");
}

#[test]
fn test_scanner_error_exits_nonzero() {
    ember()
        .write_stdin("var @x = 1;")
        .assert()
        .failure()
        .stderr("Syntax Error: Line 1. Unexpected character '@'.\n");
}

#[test]
fn test_parser_error_exits_nonzero() {
    ember()
        .write_stdin("var x = ;")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with(
            "Syntax Error: Line 1, at token ';'.",
        ));
}

#[test]
fn test_unterminated_string_reports_opening_line() {
    ember()
        .write_stdin("echo 1;\nvar s = \"oops")
        .assert()
        .failure()
        .stderr("Syntax Error: Unterminated string, opened in line 2.\n");
}

#[test]
fn test_missing_file_exits_nonzero() {
    ember()
        .arg("no_such_file.em")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_such_file.em"));
}

// =========================================================================
// DEBUG SUBCOMMANDS
// =========================================================================

#[test]
fn test_debug_tokens_format() {
    ember()
        .arg("debug_tokens")
        .write_stdin("var x = 1;\n")
        .assert()
        .success()
        .stdout(
            "1 :: VAR :: var\n\
             1 :: IDENTIFIER :: x\n\
             1 :: EQUAL :: =\n\
             1 :: NUMBER :: 1\n\
             1 :: SEMICOLON :: ;\n\
             2 :: EOF :: \n",
        );
}

#[test]
fn test_debug_tokens_from_file() {
    ember()
        .arg("debug_tokens")
        .arg(fixtures_dir().join("fib.em"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 :: DEF :: def"))
        .stdout(predicate::str::contains(":: EOF ::"));
}

#[test]
fn test_debug_expr_pretty_form() {
    ember()
        .arg("debug_expr")
        .write_stdin("1 + 2 * 3")
        .assert()
        .success()
        .stdout("(+ 1 (* 2 3))\n");
}

#[test]
fn test_debug_expr_attribute_chain() {
    ember()
        .arg("debug_expr")
        .write_stdin("self.items.pop()")
        .assert()
        .success()
        .stdout("(CALL (GET (GET self items) pop))\n");
}

// =========================================================================
// CLI SURFACE
// =========================================================================

#[test]
fn test_cli_help() {
    ember()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version() {
    ember()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ember "));
}

#[test]
fn test_cli_verbose() {
    let file = source_file("echo 1;");
    ember()
        .arg("--verbose")
        .arg(file.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Parsed 1 top-level statements"));
}

#[test]
fn test_cli_rejects_unknown_option() {
    ember()
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown option"));
}
