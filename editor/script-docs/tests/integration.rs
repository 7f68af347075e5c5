//! Integration tests for the script-docs CLI

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

const MANIFEST: &str = r#"{
  "name": "app",
  "scripts": {
    "test": "jest",
    "deploy": "./deploy.sh"
  }
}"#;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_script-docs"))
}

fn create_workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("package.json"), MANIFEST).unwrap();
    temp
}

fn write_docs(root: &Path, content: &str) {
    let dir = root.join(".vscode");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("script-docs.json"), content).unwrap();
}

#[test]
fn test_hover_builtin_default() {
    let temp = create_workspace();

    let output = binary()
        .args(["--workspace", temp.path().to_str().unwrap()])
        .args(["hover", temp.path().join("package.json").to_str().unwrap(), "4"])
        .output()
        .expect("Failed to run command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Runs tests"));
    assert!(stdout.contains("jest"));
    assert!(stdout.contains("npm run test"));
}

#[test]
fn test_hover_custom_description_json() {
    let temp = create_workspace();
    write_docs(temp.path(), r#"{"package.json": {"deploy": "Ships to prod"}}"#);

    let output = binary()
        .args(["--workspace", temp.path().to_str().unwrap()])
        .args(["hover", temp.path().join("package.json").to_str().unwrap(), "5"])
        .args(["--format", "json"])
        .output()
        .expect("Failed to run command");

    assert!(output.status.success());
    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["script"], "deploy");
    assert_eq!(info["command"], "./deploy.sh");
    assert_eq!(info["description"], "Ships to prod");
}

#[test]
fn test_hover_from_stdin() {
    let temp = create_workspace();

    let mut child = binary()
        .args(["--workspace", temp.path().to_str().unwrap()])
        .args(["hover", "-", "4", "--format", "plain"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(MANIFEST.as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Command: jest"));
    assert!(!stdout.contains("**"));
}

#[test]
fn test_hover_non_script_line_prints_nothing() {
    let temp = create_workspace();

    let output = binary()
        .args(["--workspace", temp.path().to_str().unwrap()])
        .args(["hover", temp.path().join("package.json").to_str().unwrap(), "2"])
        .output()
        .expect("Failed to run command");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_generate_writes_docs() {
    let temp = create_workspace();

    let output = binary()
        .args(["--workspace", temp.path().to_str().unwrap(), "generate", "--json"])
        .output()
        .expect("Failed to run command");

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["packages"], 1);
    assert_eq!(report["synthesized"], 2);

    let docs = fs::read_to_string(temp.path().join(".vscode/script-docs.json")).unwrap();
    assert!(docs.contains("Description for 'deploy' script in package.json: ./deploy.sh"));
}

#[test]
fn test_generate_without_manifest_fails() {
    let temp = TempDir::new().unwrap();

    let output = binary()
        .args(["--workspace", temp.path().to_str().unwrap(), "generate"])
        .output()
        .expect("Failed to run command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No package.json"));
}

#[test]
fn test_check_reports_legacy() {
    let temp = create_workspace();
    write_docs(temp.path(), r#"{"test": "x"}"#);

    let output = binary()
        .args(["--workspace", temp.path().to_str().unwrap(), "check"])
        .output()
        .expect("Failed to run command");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("legacy"));

    // check is read-only
    let docs = fs::read_to_string(temp.path().join(".vscode/script-docs.json")).unwrap();
    assert_eq!(docs, r#"{"test": "x"}"#);
}

#[test]
fn test_check_reports_invalid() {
    let temp = create_workspace();
    write_docs(temp.path(), r#"["not", "docs"]"#);

    let output = binary()
        .args(["--workspace", temp.path().to_str().unwrap(), "check"])
        .output()
        .expect("Failed to run command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid"));
}

#[test]
fn test_check_reports_nested() {
    let temp = create_workspace();
    write_docs(
        temp.path(),
        r#"{"$schemaVersion": 2, "package.json": {"test": "x"}}"#,
    );

    let output = binary()
        .args(["--workspace", temp.path().to_str().unwrap(), "check"])
        .output()
        .expect("Failed to run command");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("nested, 1 packages"));
}

#[test]
fn test_help() {
    let output = binary().arg("--help").output().expect("Failed to run command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hover"));
    assert!(stdout.contains("generate"));
}
