//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "densify-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Densify optimization API"),
        "Should show app description"
    );
    assert!(stdout.contains("analyses"), "Should show analyses command");
    assert!(
        stdout.contains("recommendations"),
        "Should show recommendations command"
    );
    assert!(
        stdout.contains("recommendation"),
        "Should show recommendation command"
    );
    assert!(stdout.contains("token"), "Should show token command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "densify-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("densify"), "Should show binary name");
}

/// Test analyses subcommand help
#[test]
fn test_analyses_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "densify-cli", "--", "analyses", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Analyses help should succeed");
    assert!(stdout.contains("--tech"), "Should show tech option");
    assert!(
        stdout.contains("--account-name"),
        "Should show account-name option"
    );
    assert!(
        stdout.contains("--account-number"),
        "Should show account-number option"
    );
    assert!(stdout.contains("--cluster"), "Should show cluster option");
}

/// Test recommendations subcommand help
#[test]
fn test_recommendations_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "densify-cli", "--", "recommendations", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        output.status.success(),
        "Recommendations help should succeed"
    );
    assert!(stdout.contains("--var-name"), "Should show var-name option");
}

/// Test recommendation subcommand help
#[test]
fn test_recommendation_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "densify-cli", "--", "recommendation", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        output.status.success(),
        "Recommendation help should succeed"
    );
    assert!(
        stdout.contains("--skip-errors"),
        "Should show skip-errors option"
    );
    assert!(
        stdout.contains("--spend-tolerance"),
        "Should show spend-tolerance option"
    );
    assert!(
        stdout.contains("--fallback-instance"),
        "Should show fallback-instance option"
    );
    assert!(
        stdout.contains("--fallback-cpu-request"),
        "Should show fallback-cpu-request option"
    );
    assert!(stdout.contains("--system"), "Should show system option");
    assert!(
        stdout.contains("--namespace"),
        "Should show namespace option"
    );
    assert!(stdout.contains("--pod"), "Should show pod option");
    assert!(
        stdout.contains("--container"),
        "Should show container option"
    );
    assert!(
        stdout.contains("--controller"),
        "Should show controller option"
    );
}

/// Test format option
#[test]
fn test_format_option() {
    let output = Command::new("cargo")
        .args(["run", "-p", "densify-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--format"), "Should show format option");
    assert!(stdout.contains("table"), "Should show table format");
    assert!(stdout.contains("json"), "Should show json format");
    assert!(stdout.contains("terraform"), "Should show terraform format");
}

/// Test connection options and env vars
#[test]
fn test_connection_options() {
    let output = Command::new("cargo")
        .args(["run", "-p", "densify-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--url"), "Should show url option");
    assert!(stdout.contains("DENSIFY_URL"), "Should show env var");
    assert!(stdout.contains("--username"), "Should show username option");
    assert!(
        stdout.contains("DENSIFY_USERNAME"),
        "Should show username env var"
    );
    assert!(stdout.contains("--timeout"), "Should show timeout option");
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = Command::new("cargo")
        .args(["run", "-p", "densify-cli", "--", "invalid-command"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}

/// Test missing required argument error handling
#[test]
fn test_missing_argument() {
    let output = Command::new("cargo")
        .args(["run", "-p", "densify-cli", "--", "analyses"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Missing argument should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error"),
        "Should show error about missing argument"
    );
}
