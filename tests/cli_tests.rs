//! CLI integration tests using the REAL stagehand binary

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

#[test]
fn test_help_output() {
    TestWorkspace::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("stage"))
        .stdout(predicate::str::contains("graph"))
        .stdout(predicate::str::contains("cache"));
}

#[test]
fn test_version_output() {
    TestWorkspace::new()
        .cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stagehand"))
        .stdout(predicate::str::contains("Build info"));
}

#[test]
fn test_completions_bash() {
    TestWorkspace::new()
        .cmd()
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stagehand"));
}

#[test]
fn test_completions_unknown_shell() {
    TestWorkspace::new()
        .cmd()
        .args(["completions", "--shell", "tcsh"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown shell 'tcsh'"));
}

#[test]
fn test_missing_manifest() {
    TestWorkspace::new()
        .cmd()
        .arg("resolve")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"))
        .stderr(predicate::str::contains("help:"));
}

#[test]
fn test_invalid_setting_override() {
    TestWorkspace::brocseg()
        .cmd()
        .args(["resolve", "-s", "flavor=vanilla"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown setting 'flavor'"));
}

#[test]
fn test_project_flag() {
    let workspace = TestWorkspace::brocseg();
    let project = workspace.path.clone();
    workspace
        .cmd()
        .current_dir(workspace.temp.path())
        .args(["graph", "-p"])
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("imgui/1.91.0"));
}
