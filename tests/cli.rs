//! Integration tests for top-level CLI behavior.

use std::process::Command;

fn run_calcheck(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_calcheck");
    Command::new(bin)
        .args(args)
        .env_remove("CALCHECK_OAUTH_CREDENTIAL_FILE")
        .env_remove("CALCHECK_TOKEN_FILE")
        .env_remove("CALCHECK_RECORD")
        .env_remove("CALCHECK_RUNNER_HELPER")
        .output()
        .expect("failed to run calcheck binary")
}

#[test]
fn help_shows_file_flags() {
    let output = run_calcheck(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--credential-file"));
    assert!(stdout.contains("--token-file"));
}

#[test]
fn positional_argument_exits_with_error() {
    let output = run_calcheck(&["foo"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unexpected argument 'foo'"));
}

#[test]
fn missing_credential_file_flag() {
    let output = run_calcheck(&["--token-file", "/tmp/tokenFile"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert_eq!(stderr.trim(), "You must specify a credentialFile");
}

#[test]
fn missing_token_file_flag_from_environment() {
    let output = Command::new(env!("CARGO_BIN_EXE_calcheck"))
        .env("CALCHECK_OAUTH_CREDENTIAL_FILE", "/tmp/credFile")
        .env_remove("CALCHECK_TOKEN_FILE")
        .env_remove("CALCHECK_RUNNER_HELPER")
        .output()
        .expect("failed to run calcheck binary");
    assert!(!output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stderr).trim(), "You must specify a tokenFile");
}

#[test]
fn unreadable_credential_file() {
    let output = run_calcheck(&[
        "--credential-file",
        "/nonexistent/credFile",
        "--token-file",
        "/nonexistent/tokenFile",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.starts_with(
        "Could not initialize token client: Unable to read app credential file: open /nonexistent/credFile: "
    ));
}
