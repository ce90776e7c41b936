//! End-to-end tests for the docguard binary
//!
//! All runs use `--offline` so they never reach the network.

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("docguard").unwrap();
    cmd.env_remove("DOCGUARD_DOCS").env_remove("DOCGUARD_LOG");
    cmd
}

fn bundle(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (rel, content) in files {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

fn docs_arg(dir: &TempDir) -> &Path {
    dir.path()
}

#[test]
fn clean_bundle_exits_zero() {
    let dir = bundle(&[("SKILL.md", "---\nname: xpr-network\n---\n"), ("guides/a.md", "# A\n")]);
    cmd()
        .arg("--docs")
        .arg(docs_arg(&dir))
        .args(["--offline", "--no-color"])
        .assert()
        .success()
        .stdout(contains("✅ SKILL.md starts with `---`"))
        .stdout(contains("guides/a.md (1 lines)"))
        .stdout(contains("All checks passed!"));
}

#[test]
fn exit_code_is_fail_count() {
    let dir = bundle(&[
        ("SKILL.md", "# no frontmatter\n"),
        ("guides/old.md", "See protonchain.com and [gone](gone.md)\n"),
    ]);
    cmd()
        .arg("--docs")
        .arg(docs_arg(&dir))
        .args(["--offline", "--no-color"])
        .assert()
        .code(3)
        .stdout(contains("❌ SKILL.md does not start with `---`"))
        .stdout(contains("Found 3 error(s) and 0 warning(s)"));
}

#[test]
fn warnings_keep_exit_zero() {
    let dir = bundle(&[("SKILL.md", "---\nrun from /Users/dave/bundle\n")]);
    cmd()
        .arg("--docs")
        .arg(docs_arg(&dir))
        .args(["--offline", "--no-color"])
        .assert()
        .success()
        .stdout(contains("⚠️"))
        .stdout(contains("Passed with 1 warning(s)"));
}

#[test]
fn json_output_is_parseable() {
    let key = format!("PVT_K1_{}", "c".repeat(50));
    let leak = format!("---\nkey: {}\n", key);
    let dir = bundle(&[("SKILL.md", leak.as_str())]);

    let output = cmd()
        .arg("--docs")
        .arg(docs_arg(&dir))
        .args(["--offline", "--output", "json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains(&key), "secret must be redacted");
    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["summary"]["errors"], 1);
    assert!(report["checks"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["check"] == "secrets" && c["status"] == "fail"));
}

#[test]
fn config_file_overrides_entry_document() {
    let dir = bundle(&[
        ("README.md", "---\ntitle: x\n---\n"),
        (".docguard.toml", "entry_document = \"README.md\"\n"),
    ]);
    cmd()
        .arg("--docs")
        .arg(docs_arg(&dir))
        .args(["--offline", "--no-color"])
        .assert()
        .success()
        .stdout(contains("README.md starts with `---`"));
}

#[test]
fn missing_docs_root_is_startup_failure() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg("--docs")
        .arg(dir.path().join("absent"))
        .arg("--offline")
        .assert()
        .code(255)
        .stderr(contains("Docs root not found"));
}

#[test]
fn bad_config_is_startup_failure() {
    let dir = bundle(&[
        ("SKILL.md", "---\n"),
        ("docguard.toml", "[endpoints]\npattern = \"([\"\n"),
    ]);
    cmd()
        .arg("--docs")
        .arg(docs_arg(&dir))
        .arg("--offline")
        .assert()
        .code(255)
        .stderr(contains("Invalid pattern"));
}
