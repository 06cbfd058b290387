//! Tests for the command-line driver: exit codes, output routing, and the
//! one-diagnostic-line shape of every failure.

use std::path::PathBuf;
use std::process::{Command, Output};

fn rpal() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rpal"))
}

/// Write a program to a unique temporary file and return its path.
fn write_program(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("rpal-cli-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).expect("writing the test program failed");
    path
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is UTF-8")
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).expect("stderr is UTF-8")
}

/// Assert the contract every failure path shares: non-zero exit and exactly
/// one diagnostic line on stderr.
fn assert_single_diagnostic(output: &Output) -> String {
    assert!(!output.status.success(), "expected a non-zero exit code");
    let stderr = stderr_of(output);
    assert_eq!(
        stderr.trim_end_matches('\n').lines().count(),
        1,
        "stderr should be exactly one line, got: {stderr:?}"
    );
    stderr
}

#[test]
fn run_prints_only_print_output() {
    let path = write_program("hello.rpal", "Print 'Hello, World!'");
    let output = rpal().arg(&path).output().expect("running the interpreter failed");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "Hello, World!\n");
    assert_eq!(stderr_of(&output), "");
}

#[test]
fn final_value_is_not_auto_printed() {
    let path = write_program("silent.rpal", "1 + 2");
    let output = rpal().arg(&path).output().expect("running the interpreter failed");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "");
}

#[test]
fn ast_flag_prints_the_tree() {
    let path = write_program("tree.rpal", "let x = 5 in x");
    let output = rpal()
        .arg(&path)
        .arg("-ast")
        .output()
        .expect("running the interpreter failed");
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "let\n.=\n..<IDENT:x>\n..<INT:5>\n.<IDENT:x>\n"
    );
}

#[test]
fn st_flag_prints_the_standardized_tree() {
    let path = write_program("st.rpal", "let x = 5 in x");
    let output = rpal()
        .arg(&path)
        .arg("-st")
        .output()
        .expect("running the interpreter failed");
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "gamma\n.lambda\n..<IDENT:x>\n..<IDENT:x>\n.<INT:5>\n"
    );
}

#[test]
fn missing_file_is_one_diagnostic_line() {
    let output = rpal()
        .arg("no-such-program.rpal")
        .output()
        .expect("running the interpreter failed");
    let stderr = assert_single_diagnostic(&output);
    assert!(stderr.contains("no-such-program.rpal"));
}

#[test]
fn lex_error_is_one_diagnostic_line() {
    let path = write_program("lexfail.rpal", "x # y");
    let output = rpal().arg(&path).output().expect("running the interpreter failed");
    let stderr = assert_single_diagnostic(&output);
    assert!(stderr.contains("unrecognized character"));
}

#[test]
fn parse_error_is_one_diagnostic_line() {
    let path = write_program("parsefail.rpal", "let x = 5");
    let output = rpal().arg(&path).output().expect("running the interpreter failed");
    let stderr = assert_single_diagnostic(&output);
    assert!(stderr.contains("'in'"));
}

#[test]
fn runtime_error_is_one_diagnostic_line() {
    let path = write_program("runfail.rpal", "1 / 0");
    let output = rpal().arg(&path).output().expect("running the interpreter failed");
    let stderr = assert_single_diagnostic(&output);
    assert!(stderr.contains("division by zero"));
}

#[test]
fn print_output_before_an_error_is_kept() {
    let path = write_program("partial.rpal", "let d = Print 1 in 1 / 0");
    let output = rpal().arg(&path).output().expect("running the interpreter failed");
    assert_single_diagnostic(&output);
    assert_eq!(stdout_of(&output), "1\n");
}
