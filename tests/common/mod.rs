//! Common test utilities for stagehand integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Manifest used by most tests: the brocseg project
pub const BROCSEG_MANIFEST: &str = r#"name: brocseg
requires:
  - sdl/2.30.7
  - glad/0.1.36
  - glm/cci.20230113
  - imgui/1.91.0
options:
  "glad*:gl_profile": core
  "glad*:gl_version": "4.6"
generators: [cmake-toolchain, cmake-deps]
bindings:
  - { package: imgui, pattern: "*sdl*", from: res/bindings, to: src/imgui_bindings }
  - { package: imgui, pattern: "*opengl3*", from: res/bindings, to: src/imgui_bindings }
"#;

/// A project with its own recipe registry and an isolated package cache
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Project root (contains stagehand.yaml and recipes/)
    pub path: PathBuf,
    /// Cache root passed through STAGEHAND_CACHE_DIR
    pub cache: PathBuf,
}

impl TestWorkspace {
    /// Create an empty project with the standard recipe registry
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("brocseg");
        let cache = temp.path().join("cache");
        std::fs::create_dir_all(&path).expect("Failed to create project directory");

        let workspace = Self { temp, path, cache };
        workspace.write_registry();
        workspace
    }

    /// Project with the brocseg manifest
    pub fn brocseg() -> Self {
        let workspace = Self::new();
        workspace.write_manifest(BROCSEG_MANIFEST);
        workspace
    }

    pub fn write_manifest(&self, content: &str) {
        self.write_file("stagehand.yaml", content);
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        write(&self.path.join(path), content);
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Sorted file names directly inside a project directory
    pub fn file_names(&self, dir: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path.join(dir))
            .expect("Failed to read directory")
            .map(|e| e.expect("Failed to read entry").file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    /// Add a recipe (and optional source files) to the registry
    pub fn add_recipe(&self, name: &str, version: &str, recipe: &str, files: &[(&str, &str)]) {
        let dir = self.path.join("recipes").join(name).join(version);
        write(&dir.join("recipe.yaml"), recipe);
        for (file, content) in files {
            write(&dir.join("package").join(file), content);
        }
    }

    /// `stagehand` running inside the project, isolated from the environment
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("stagehand").expect("Failed to find stagehand binary");
        cmd.current_dir(&self.path)
            .env("STAGEHAND_CACHE_DIR", &self.cache)
            .env_remove("STAGEHAND_REGISTRY")
            .env_remove("STAGEHAND_PROJECT")
            .env_remove("STAGEHAND_LOG");
        cmd
    }

    fn write_registry(&self) {
        self.add_recipe(
            "sdl",
            "2.30.7",
            "name: sdl\nversion: 2.30.7\nlicense: Zlib\n\
             options: { shared: [true, false] }\ndefault_options: { shared: false }\n\
             layout: { include_dirs: [include, include/SDL2], libs: [SDL2, SDL2main] }\n",
            &[("include/SDL2/SDL.h", "/* SDL */\n")],
        );
        self.add_recipe(
            "glad",
            "0.1.36",
            "name: glad\nversion: 0.1.36\n\
             options:\n  gl_profile: [core, compatibility]\n  gl_version: ANY\n  \
             spec: [gl, gles2]\n  no_loader: [true, false]\n\
             default_options: { gl_profile: compatibility, gl_version: \"3.3\", spec: gl, no_loader: false }\n\
             layout: { libs: [glad] }\n",
            &[("include/glad/glad.h", "/* glad */\n"), ("src/glad.c", "/* glad */\n")],
        );
        self.add_recipe(
            "glm",
            "cci.20230113",
            "name: glm\nversion: cci.20230113\nheader_only: true\n",
            &[("include/glm/glm.hpp", "// glm\n")],
        );
        self.add_recipe(
            "imgui",
            "1.91.0",
            "name: imgui\nversion: 1.91.0\nrequires: [glad/0.1.36]\nlayout: { libs: [imgui] }\n",
            &[
                ("include/imgui.h", "// imgui\n"),
                ("res/bindings/imgui_impl_sdl2.cpp", "// sdl2 backend\n"),
                ("res/bindings/imgui_impl_sdl2.h", "// sdl2 backend\n"),
                ("res/bindings/imgui_impl_sdlrenderer2.cpp", "// sdl renderer\n"),
                ("res/bindings/imgui_impl_opengl3.cpp", "// opengl3 backend\n"),
                ("res/bindings/imgui_impl_opengl3.h", "// opengl3 backend\n"),
                ("res/bindings/imgui_impl_vulkan.cpp", "// vulkan backend\n"),
            ],
        );
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}
