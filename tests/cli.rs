use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn js_dir(root: &Path) -> PathBuf {
    root.join("web-app").join("build").join("static").join("js")
}

fn console_with(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let js = js_dir(dir.path());
    fs::create_dir_all(&js).unwrap();
    for (name, content) in files {
        fs::write(js.join(name), content).unwrap();
    }
    dir
}

fn rebrand(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rebrand"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn patches_bundles_and_prints_summary() {
    let dir = console_with(&[
        (
            "main.js",
            "\"MinIO Console is part of MinIO, Inc. See min.io/downloads.\"",
        ),
        ("vendor.js", "function noop(){}"),
        ("main.js.map", "MinIO"),
    ]);
    let root = dir.path().to_str().unwrap();

    let output = rebrand(&[root]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Found 2 JS file(s):"));
    assert!(out.contains("MinIO Console"));
    assert!(out.contains("(no replacements needed)"));
    assert!(out.contains("Done. 3 total replacements across 1 file(s)."));

    let js = js_dir(dir.path());
    assert_eq!(
        fs::read_to_string(js.join("main.js")).unwrap(),
        "\"Hanzo Space is part of Hanzo AI. See hanzo.ai/downloads.\""
    );
    assert_eq!(fs::read_to_string(js.join("vendor.js")).unwrap(), "function noop(){}");
    assert_eq!(fs::read_to_string(js.join("main.js.map")).unwrap(), "MinIO");
}

#[test]
fn missing_build_directory_exits_with_one() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("main.js"), "MinIO").unwrap();

    let output = rebrand(&[dir.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("ERROR: JS build directory not found"));
    assert!(stdout(&output).is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("main.js")).unwrap(), "MinIO");
}

#[test]
fn empty_build_directory_exits_with_one() {
    let dir = console_with(&[("main.js.map", "{}")]);

    let output = rebrand(&[dir.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("ERROR: No .js files found"));
}

#[test]
fn defaults_to_current_directory() {
    let dir = console_with(&[("app.js", "https://min.io")]);

    let output = Command::new(env!("CARGO_BIN_EXE_rebrand"))
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(js_dir(dir.path()).join("app.js")).unwrap(),
        "https://hanzo.ai"
    );
}

#[test]
fn zero_changes_still_succeeds() {
    let dir = console_with(&[("app.js", "console.log('hello')")]);

    let output = rebrand(&[dir.path().to_str().unwrap()]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Done. 0 total replacements across 0 file(s)."));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = console_with(&[("app.js", "MinIO Browser")]);

    let output = rebrand(&["--dry-run", dir.path().to_str().unwrap()]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Done. 1 total replacements across 1 file(s)."));
    assert_eq!(
        fs::read_to_string(js_dir(dir.path()).join("app.js")).unwrap(),
        "MinIO Browser"
    );
}

#[test]
fn json_report_envelope() {
    let dir = console_with(&[("app.js", "SUBNET mySUBNET")]);

    let output = rebrand(&["--json", dir.path().to_str().unwrap()]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["data"]["total_replacements"], 1);
    assert_eq!(value["data"]["patched_files"], 1);
    assert_eq!(value["data"]["files"][0]["matches"][0]["label"], "SUBNET (standalone)");
}

#[test]
fn json_error_envelope() {
    let dir = TempDir::new().unwrap();

    let output = rebrand(&["--json", dir.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["error"]["code"], "target.directory_not_found");
}

#[test]
fn custom_rules_file() {
    let dir = console_with(&[("app.js", "Acme Cloud and Acme")]);
    let rules = dir.path().join("rules.toml");
    fs::write(
        &rules,
        "verify = [\"Acme\"]\n\n[[rule]]\nlabel = \"Acme Cloud\"\nfind = \"Acme Cloud\"\nreplace = \"Globex Cloud\"\n",
    )
    .unwrap();

    let output = rebrand(&[
        "--rules",
        rules.to_str().unwrap(),
        dir.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("WARNING: 1 'Acme' references remain"));
    assert_eq!(
        fs::read_to_string(js_dir(dir.path()).join("app.js")).unwrap(),
        "Globex Cloud and Acme"
    );
}

#[test]
fn invalid_rules_file_exits_with_two() {
    let dir = console_with(&[("app.js", "MinIO")]);
    let rules = dir.path().join("rules.toml");
    fs::write(&rules, "[[rule]]\nlabel = 1\n").unwrap();

    let output = rebrand(&[
        "--rules",
        rules.to_str().unwrap(),
        dir.path().to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        fs::read_to_string(js_dir(dir.path()).join("app.js")).unwrap(),
        "MinIO"
    );
}

#[test]
fn list_rules_prints_table_in_order() {
    let output = rebrand(&["--list-rules"]);

    assert!(output.status.success());
    let out = stdout(&output);
    let console = out.find("MinIO Console").unwrap();
    let catch_all = out.find("MinIO (catch-all)").unwrap();
    assert!(console < catch_all);
    assert!(out.contains("not followed by letter_or_underscore"));
    assert!(out.contains("verify: MinIO, min.io"));
}
