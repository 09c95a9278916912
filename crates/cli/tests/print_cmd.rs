//! CLI tests for the `labels print` subcommand.

mod common;

use std::fs;

use common::{entries_with_prefix, labels_cmd, run_json, workspace};

#[test]
fn print_help_shows_flags() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = labels_cmd(dir.path())
        .args(["print", "--help"])
        .output()
        .expect("run print help");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--out", "--catalogue", "--start", "--start-row", "--start-col"] {
        assert!(stdout.contains(flag), "missing {flag} in help: {stdout}");
    }
}

#[test]
fn print_writes_one_svg_per_page_and_listing() {
    let dir = workspace();
    let out = dir.path().join("sheets");
    let (output, json) = run_json(labels_cmd(dir.path()).args([
        "print",
        "K",
        "--out",
        "sheets",
        "--start",
        "5",
        "--output",
        "json",
    ]));
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(json["summary"]["total_pages"], 2);
    assert_eq!(json["summary"]["left_on_last_page"], 7);

    let pages = entries_with_prefix(&out, "page-");
    assert_eq!(
        pages
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect::<Vec<_>>(),
        vec!["page-001.svg", "page-002.svg"]
    );
    let first = fs::read_to_string(&pages[0]).expect("read page 1");
    assert!(first.starts_with("<?xml"));
    assert_eq!(first.matches("<text").count(), 5);
    assert!(first.contains(">K2/1-001</text>"));
    let second = fs::read_to_string(&pages[1]).expect("read page 2");
    assert_eq!(second.matches("<text").count(), 2);
    assert!(second.contains(">K5/5-001</text>"));

    let listing: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("listing.json")).expect("read listing"))
            .expect("listing is JSON");
    let callnumbers: Vec<&str> = listing
        .as_array()
        .expect("listing array")
        .iter()
        .filter_map(|r| r["callnumber"].as_str())
        .collect();
    assert_eq!(callnumbers, vec!["K2/1-001", "K4/11-101", "K5/5-001"]);

    assert!(entries_with_prefix(&out, ".labels-").is_empty());
}

#[test]
fn print_no_matches_writes_blank_page() {
    let dir = workspace();
    let out = dir.path().join("sheets");
    let (output, json) = run_json(labels_cmd(dir.path()).args([
        "print", "Z", "--out", "sheets", "--output", "json",
    ]));
    assert!(output.status.success());
    assert_eq!(json["summary"]["total_pages"], 1);
    assert_eq!(json["summary"]["left_on_last_page"], 9);
    assert_eq!(entries_with_prefix(&out, "page-").len(), 1);
}

#[test]
fn print_bad_start_leaves_output_untouched() {
    let dir = workspace();
    let out = dir.path().join("sheets");
    let (output, json) = run_json(labels_cmd(dir.path()).args([
        "print", "K", "--out", "sheets", "--start", "42", "--output", "json",
    ]));
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["ok"], false);
    assert_eq!(json["diagnostics"][0]["id"], "SHL3002");
    assert!(!out.exists() || fs::read_dir(&out).expect("read out").next().is_none());
}

#[test]
fn print_again_replaces_pages_of_longer_run() {
    let dir = workspace();
    let out = dir.path().join("sheets");
    let (first, json) = run_json(labels_cmd(dir.path()).args([
        "print", "K", "--out", "sheets", "--start", "5", "--output", "json",
    ]));
    assert!(first.status.success());
    assert_eq!(json["summary"]["total_pages"], 2);
    fs::write(out.join("notes.txt"), "keep me").expect("write unrelated file");

    let (second, json) = run_json(labels_cmd(dir.path()).args([
        "print", "K4", "--out", "sheets", "--output", "json",
    ]));
    assert!(
        second.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&second.stderr)
    );
    assert_eq!(json["summary"]["total_pages"], 1);

    let pages = entries_with_prefix(&out, "page-");
    assert_eq!(pages, vec![out.join("page-001.svg")]);
    let page = fs::read_to_string(&pages[0]).expect("read page");
    assert!(page.contains(">K4/11-101</text>"));
    assert!(!page.contains(">K2/1-001</text>"));
    assert!(out.join("notes.txt").exists());
    assert!(out.join("listing.json").exists());
}

#[test]
fn print_query_error_writes_nothing() {
    let dir = workspace();
    let out = dir.path().join("sheets");
    let output = labels_cmd(dir.path())
        .args(["print", "K--A", "--out", "sheets", "--output", "pretty"])
        .output()
        .expect("run print");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SHL1004"), "{stderr}");
    assert!(!out.exists());
}
