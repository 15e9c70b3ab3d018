//! Integration tests for the `genforge` binary.
//!
//! Every invocation gets its own config file so a developer's real
//! configuration never leaks in.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A scratch workspace with a config file, a manifest directory holding a
/// command-free `hello` template, and an output root.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("templates/hello");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("template.toml"), HELLO_MANIFEST).unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();

        let config = format!(
            "[templates]\nmanifest_dir = {:?}\n\n[generation]\noutput_root = {:?}\n",
            dir.path().join("templates").display().to_string(),
            dir.path().join("out").display().to_string(),
        );
        fs::write(dir.path().join("config.toml"), config).unwrap();
        Self { dir }
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn cmd(&self) -> Command {
        let mut cmd = genforge();
        cmd.current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .env_remove("GENFORGE_TEMPLATES_DIR")
            .arg("--config")
            .arg(self.config());
        cmd
    }
}

const HELLO_MANIFEST: &str = r#"
[template]
id = "hello-web"
name = "Hello"
archetype = "hello"

[constraints]
platforms = ["web"]

[[files]]
path = "index.txt"
content = "hello {{name}}"

[[validation]]
kind = "file-exists"
description = "index exists"
paths = ["index.txt"]
"#;

fn genforge() -> Command {
    Command::cargo_bin("genforge").unwrap()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn help_lists_subcommands() {
    genforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("constraints"));
}

#[test]
fn version_flag() {
    genforge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_is_usage_error() {
    genforge()
        .args(["list", "--no-such-flag"])
        .assert()
        .code(2);
}

#[test]
fn list_json_includes_builtins_and_manifests() {
    let sandbox = Sandbox::new();
    let assert = sandbox
        .cmd()
        .args(["list", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let templates: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let ids: Vec<&str> = templates
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["id"].as_str())
        .collect();
    assert!(ids.contains(&"chrome-extension-v3"));
    assert!(ids.contains(&"hello-web"));
}

#[test]
fn list_filtered_by_archetype() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["list", "--archetype", "expo-mobile", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("expo-mobile-app"))
        .stdout(predicate::str::contains("chrome-extension-v3").not());
}

#[test]
fn constraints_shows_profile() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["constraints", "nx-monorepo", "--validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archetype: nx-monorepo"))
        .stdout(predicate::str::contains("Constraints are valid"));
}

#[test]
fn unknown_archetype_is_not_found() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["constraints", "cobol-mainframe"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown archetype 'cobol-mainframe'"));
}

#[test]
fn malformed_archetype_is_user_error() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["generate", "x", "--archetype", "not_valid!"])
        .assert()
        .code(2);
}

#[test]
fn archetype_without_template_is_not_found() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["generate", "site", "--archetype", "nextjs-web"])
        .assert()
        .code(3);
    assert!(!sandbox.out().join("site").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["generate", "Tab Tamer", "-a", "chrome-extension", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("manifest.json"))
        .stdout(predicate::str::contains("npm run build"));
    assert!(!sandbox.out().join("Tab Tamer").exists());
}

#[test]
fn generate_from_manifest_template() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["generate", "Demo", "-a", "hello", "-p", "web"])
        .assert()
        .success();

    assert_eq!(read(&sandbox.out().join("Demo/index.txt")), "hello Demo");
}

#[test]
fn explicit_output_dir_wins() {
    let sandbox = Sandbox::new();
    let elsewhere = sandbox.dir.path().join("elsewhere");
    sandbox
        .cmd()
        .args(["generate", "Demo", "-a", "hello", "-p", "web", "-o"])
        .arg(&elsewhere)
        .assert()
        .success();

    assert!(elsewhere.join("Demo/index.txt").exists());
    assert!(!sandbox.out().join("Demo").exists());
}

#[test]
fn json_output_is_the_generation_result() {
    let sandbox = Sandbox::new();
    let assert = sandbox
        .cmd()
        .args([
            "--output-format",
            "json",
            "generate",
            "Demo",
            "-a",
            "hello",
            "-p",
            "web",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["success"], true);
    assert_eq!(result["state"], "completed");
    assert_eq!(result["files_written"][0], "index.txt");
}

#[test]
fn failed_validation_exits_with_five_and_keeps_files() {
    let sandbox = Sandbox::new();
    let manifest = sandbox.dir.path().join("templates/hello/template.toml");
    let with_missing = format!(
        "{HELLO_MANIFEST}\n[[validation]]\nkind = \"file-exists\"\ndescription = \"missing exists\"\npaths = [\"missing.txt\"]\n"
    );
    fs::write(&manifest, with_missing).unwrap();

    sandbox
        .cmd()
        .args(["generate", "Demo", "-a", "hello", "-p", "web"])
        .assert()
        .code(5)
        .stdout(predicate::str::contains("Some validations failed"));

    assert!(sandbox.out().join("Demo/index.txt").exists());
}

#[test]
fn bad_var_is_user_error() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["generate", "Demo", "-a", "hello", "--var", "oops"])
        .assert()
        .code(2);
}

#[test]
fn completions_bash() {
    genforge()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("genforge"));
}

#[test]
fn config_path_points_at_toml() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".toml"));
}

#[test]
fn config_get_reads_file_and_env() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "get", "templates.manifest_dir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("templates"));

    sandbox
        .cmd()
        .env("GENFORGE__ENHANCER__MODEL", "tiny-model")
        .args(["config", "get", "enhancer.model"])
        .assert()
        .success()
        .stdout(predicate::str::diff("tiny-model\n"));
}

#[test]
fn missing_config_file_is_configuration_error() {
    let sandbox = Sandbox::new();
    genforge()
        .current_dir(sandbox.dir.path())
        .args(["--config", "does-not-exist.toml", "list"])
        .assert()
        .code(4);
}
