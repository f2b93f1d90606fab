use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("quill")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("exec"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_exec_help_shows_attach_flag() {
    cargo_bin_cmd!("quill")
        .args(["exec", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--attach"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("quill")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
