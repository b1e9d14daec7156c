use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_issues_are_logged_but_computation_continues() {
    let mut cmd = Command::new(cargo_bin!("warikan"));
    cmd.arg("tests/fixtures/broken.json");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "expense e1 is paid by unknown member ghost",
        ))
        .stderr(predicate::str::contains("food"))
        .stdout(predicate::str::contains("a,A,0,50,0,-50"))
        .stdout(predicate::str::contains("settlement").not());
}

#[test]
fn test_strict_mode_rejects_invalid_project() {
    let mut cmd = Command::new(cargo_bin!("warikan"));
    cmd.arg("tests/fixtures/broken.json").arg("--strict");

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid project data (2 issue(s))"));
}

#[test]
fn test_strict_mode_accepts_valid_project() {
    let mut cmd = Command::new(cargo_bin!("warikan"));
    cmd.arg("tests/fixtures/trip.json").arg("--strict");

    cmd.assert().success();
}
