//! Shared helpers for `labels` CLI tests.

#![allow(unreachable_pub, dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use assert_cmd::cargo;

/// A small library catalogue used across tests.
pub const CATALOGUE: &str = r#"[
    {"callnumber": "K5/5-001", "quantity": 2, "title": "Dune"},
    {"callnumber": "A12/3-002", "quantity": 1},
    {"callnumber": "K4/11-101", "quantity": 1, "author": "Le Guin"},
    {"callnumber": "B1/4-002", "quantity": 1},
    {"callnumber": "B1/5-001", "quantity": 3},
    {"callnumber": "K2/1-001", "quantity": 4}
]"#;

/// Settings pointing at `catalogue.json` with a 3×3 grid.
pub const SETTINGS: &str = r#"{
    "catalogue": { "path": "catalogue.json" },
    "design": { "grid": { "columns": 3, "rows": 3 } }
}"#;

/// `labels` command running inside `dir`.
pub fn labels_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("labels"));
    cmd.current_dir(dir);
    cmd
}

/// Temp dir holding `config.json` and `catalogue.json`.
pub fn workspace() -> tempfile::TempDir {
    workspace_with(SETTINGS, CATALOGUE)
}

/// Temp dir holding the given settings and catalogue.
pub fn workspace_with(settings: &str, catalogue: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("config.json"), settings).expect("write settings");
    fs::write(dir.path().join("catalogue.json"), catalogue).expect("write catalogue");
    dir
}

/// Run and parse stdout as JSON.
pub fn run_json(cmd: &mut Command) -> (Output, serde_json::Value) {
    let output = cmd.output().expect("run labels");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {stdout}"));
    (output, json)
}

/// Entries of `dir` whose name starts with `prefix`.
pub fn entries_with_prefix(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with(prefix))
        })
        .collect();
    found.sort();
    found
}
