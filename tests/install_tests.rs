//! End-to-end configuration passes: resolve, generate and stage

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

#[test]
fn test_install_generates_and_stages() {
    let workspace = TestWorkspace::brocseg();

    workspace
        .cmd()
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved 4 packages"))
        .stdout(predicate::str::contains("Staged 5 files"));

    assert!(workspace.file_exists("stagehand.lock"));
    assert!(workspace.file_exists("build/generators/stagehand_toolchain.cmake"));
    for package in ["sdl", "glad", "glm", "imgui"] {
        assert!(workspace.file_exists(&format!("build/generators/{package}-config.cmake")));
        assert!(workspace.file_exists(&format!(
            "build/generators/{package}-config-version.cmake"
        )));
    }

    assert_eq!(
        workspace.file_names("src/imgui_bindings"),
        vec![
            "imgui_impl_opengl3.cpp",
            "imgui_impl_opengl3.h",
            "imgui_impl_sdl2.cpp",
            "imgui_impl_sdl2.h",
            "imgui_impl_sdlrenderer2.cpp",
        ]
    );
    assert_eq!(
        workspace.read_file("src/imgui_bindings/imgui_impl_sdl2.cpp"),
        "// sdl2 backend\n"
    );

    let toolchain = workspace.read_file("build/generators/stagehand_toolchain.cmake");
    assert!(toolchain.contains("set(STAGEHAND_GLAD_GL_PROFILE \"core\")"));
    assert!(toolchain.contains("set(STAGEHAND_GLAD_GL_VERSION \"4.6\")"));
    assert!(toolchain.contains("set(STAGEHAND_SDL_SHARED \"False\")"));
}

#[test]
fn test_install_twice_is_idempotent() {
    let workspace = TestWorkspace::brocseg();
    workspace.cmd().arg("install").assert().success();
    let lockfile = workspace.read_file("stagehand.lock");
    let files = workspace.file_names("src/imgui_bindings");

    workspace
        .cmd()
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 cached"))
        .stdout(predicate::str::contains("Updated stagehand.lock").not());

    assert_eq!(workspace.read_file("stagehand.lock"), lockfile);
    assert_eq!(workspace.file_names("src/imgui_bindings"), files);
}

#[test]
fn test_only_bindings_matching_pattern_are_copied() {
    let workspace = TestWorkspace::new();
    workspace.write_manifest(
        "name: demo\nrequires: [imgui/1.91.0]\nbindings:\n  \
         - { package: imgui, pattern: \"*sdl*\", from: res/bindings, to: src/imgui_bindings }\n",
    );

    workspace.cmd().arg("stage").assert().success();
    assert_eq!(
        workspace.file_names("src/imgui_bindings"),
        vec!["imgui_impl_sdl2.cpp", "imgui_impl_sdl2.h", "imgui_impl_sdlrenderer2.cpp"]
    );
}

#[test]
fn test_missing_bindings_source() {
    let workspace = TestWorkspace::new();
    workspace.write_manifest(
        "name: demo\nrequires: [imgui/1.91.0]\nbindings:\n  \
         - { package: imgui, pattern: \"*\", from: res/backends, to: src/imgui_bindings }\n",
    );

    workspace
        .cmd()
        .arg("stage")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Bindings source path not found"));
    assert!(!workspace.file_exists("src/imgui_bindings"));
}

#[test]
fn test_stage_dry_run_writes_nothing() {
    let workspace = TestWorkspace::brocseg();

    workspace
        .cmd()
        .args(["stage", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would stage 5 files"));
    assert!(!workspace.file_exists("src"));
    assert!(!workspace.file_exists("stagehand.lock"));
}

#[test]
fn test_overlapping_directives_report_overwrite() {
    let workspace = TestWorkspace::new();
    workspace.write_manifest(
        "name: demo\nrequires: [imgui/1.91.0]\nbindings:\n  \
         - { package: imgui, pattern: \"*sdl2*\", from: res/bindings, to: src/b }\n  \
         - { package: imgui, pattern: \"*.cpp\", from: res/bindings, to: src/b }\n",
    );

    workspace
        .cmd()
        .arg("stage")
        .assert()
        .success()
        .stdout(predicate::str::contains("imgui_impl_sdl2.cpp (overwrite)"));
}

#[test]
fn test_version_conflict_stops_before_generators() {
    let workspace = TestWorkspace::new();
    workspace.add_recipe("glad", "0.1.34", "name: glad\nversion: 0.1.34\n", &[]);
    workspace.write_manifest(
        "name: demo\nrequires: [glad/0.1.36, glad/0.1.34]\ngenerators: [cmake-deps]\n",
    );

    workspace
        .cmd()
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Version conflict for 'glad'"));
    assert!(!workspace.file_exists("build"));
    assert!(!workspace.file_exists("stagehand.lock"));
}

#[test]
fn test_transitive_version_conflict() {
    let workspace = TestWorkspace::new();
    workspace.add_recipe("glad", "0.1.34", "name: glad\nversion: 0.1.34\n", &[]);
    workspace.write_manifest(
        "name: demo\nrequires: [glad/0.1.34, imgui/1.91.0]\ngenerators: [cmake-deps]\n",
    );

    workspace
        .cmd()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Version conflict for 'glad'"));
    assert!(!workspace.file_exists("build"));
}

#[test]
fn test_unknown_generator() {
    let workspace = TestWorkspace::new();
    workspace.write_manifest("name: demo\nrequires: [glm/cci.20230113]\ngenerators: [premake]\n");

    workspace
        .cmd()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown generator: premake"));
}

#[test]
fn test_package_not_found() {
    let workspace = TestWorkspace::new();
    workspace.write_manifest("name: demo\nrequires: [sdl/3.0.0]\n");

    workspace
        .cmd()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Package 'sdl/3.0.0' not found"));
}

#[test]
fn test_option_conflict() {
    let workspace = TestWorkspace::brocseg();

    workspace
        .cmd()
        .args(["resolve", "-o", "glad:gl_profile=es"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Option 'gl_profile' rejected by package 'glad'"));

    workspace
        .cmd()
        .args(["resolve", "-o", "sdl:vulkan=true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Option 'vulkan' rejected by package 'sdl'"));
}

#[test]
fn test_circular_dependency() {
    let workspace = TestWorkspace::new();
    workspace.add_recipe("a", "1.0", "name: a\nversion: \"1.0\"\nrequires: [b/1.0]\n", &[]);
    workspace.add_recipe("b", "1.0", "name: b\nversion: \"1.0\"\nrequires: [a/1.0]\n", &[]);
    workspace.write_manifest("name: demo\nrequires: [a/1.0]\n");

    workspace
        .cmd()
        .arg("graph")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular dependency detected"));
}

#[test]
fn test_cli_option_override_changes_package_id() {
    let workspace = TestWorkspace::brocseg();

    let default = workspace.cmd().args(["graph", "--json"]).output().unwrap();
    let shared = workspace
        .cmd()
        .args(["graph", "--json", "-o", "sdl*:shared=true"])
        .output()
        .unwrap();
    assert!(default.status.success());
    assert!(shared.status.success());

    let id = |out: &[u8], name: &str| -> String {
        let value: serde_json::Value = serde_json::from_slice(out).unwrap();
        value["packages"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["name"] == name)
            .map(|p| p["package_id"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_ne!(id(&default.stdout, "sdl"), id(&shared.stdout, "sdl"));
    assert_eq!(id(&default.stdout, "glm"), id(&shared.stdout, "glm"));
}
