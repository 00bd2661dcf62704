//! CLI interface tests
//!
//! Tests basic CLI functionality like --help, --version flags

use predicates::prelude::*;
use tempfile::TempDir;

mod common;
use common::bin_in;

#[test]
fn test_cli_help_flag_displays_usage_information() {
    let temp_dir = TempDir::new().unwrap();
    bin_in(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build artifact size tracker"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_cli_version_flag_displays_version_number() {
    let temp_dir = TempDir::new().unwrap();
    bin_in(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("build-tracker"));
}

#[test]
fn test_cli_without_subcommand_fails() {
    let temp_dir = TempDir::new().unwrap();
    bin_in(temp_dir.path()).assert().failure().code(2);
}

#[test]
fn test_cli_rejects_unknown_format() {
    let temp_dir = TempDir::new().unwrap();
    bin_in(temp_dir.path())
        .args(["compare", "builds.json", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("xml"));
}
