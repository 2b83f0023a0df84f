// Command-line host against real files

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_journal-richtext"))
        .args(args)
        .arg("--config")
        .arg(dir.join("editor.toml"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn normalize_prints_canonical_markup() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("entry.html");
    fs::write(&entry, "<div><strong>hi</strong> <em>there</em></div>").unwrap();

    let output = run(&["normalize", entry.to_str().unwrap()], dir.path());
    assert_eq!(stdout(&output).trim_end(), "<p><b>hi</b> <i>there</i></p>");
}

#[test]
fn apply_replays_script() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("entry.html");
    let script = dir.path().join("script.json");
    fs::write(&entry, "<p>hello</p>").unwrap();
    fs::write(
        &script,
        r#"[
            {"select": "0:0:0..0:0:5"},
            {"key": "Ctrl+B"},
            {"select": "0:0:5"},
            {"command": "insertText", "text": " you"}
        ]"#,
    )
    .unwrap();

    let output = run(
        &[
            "apply",
            entry.to_str().unwrap(),
            "--script",
            script.to_str().unwrap(),
        ],
        dir.path(),
    );
    let result: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["markup"], "<p><b>hello you</b></p>");
    assert_eq!(result["changed"], true);
    assert_eq!(result["wordCount"], 2);
    assert_eq!(result["activeFormatState"]["bold"], true);
}

#[test]
fn state_reports_formatting() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("entry.html");
    fs::write(&entry, r#"<ul><li>a<span style="font-size: 24px">big</span></li></ul>"#).unwrap();

    let output = run(
        &["state", entry.to_str().unwrap(), "--at", "0:1:1"],
        dir.path(),
    );
    let state: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(state["fontSizePx"], 24);
    assert_eq!(state["blockType"], "unordered-list");
    assert_eq!(state["bold"], false);
}

#[test]
fn sanitize_lists_and_rewrites_entries() {
    let dir = tempfile::tempdir().unwrap();
    let entries = dir.path().join("entries");
    fs::create_dir_all(entries.join("2024")).unwrap();
    let dark = entries.join("2024").join("dark.html");
    let clean = entries.join("clean.html");
    let other = entries.join("notes.txt");
    fs::write(&dark, r#"<p><span style="color: #000000">x</span></p>"#).unwrap();
    fs::write(&clean, "<p>fine</p>").unwrap();
    fs::write(&other, r#"<p><span style="color: #000000">x</span></p>"#).unwrap();

    let output = run(&["sanitize", entries.to_str().unwrap()], dir.path());
    let listed = stdout(&output);
    assert!(listed.contains("dark.html"));
    assert!(!listed.contains("clean.html"));
    assert!(!listed.contains("notes.txt"));
    // dry run by default
    assert!(fs::read_to_string(&dark).unwrap().contains("#000000"));

    let output = run(
        &["sanitize", entries.to_str().unwrap(), "--write"],
        dir.path(),
    );
    stdout(&output);
    assert_eq!(fs::read_to_string(&dark).unwrap(), "<p>x</p>");
    assert!(fs::read_to_string(&other).unwrap().contains("#000000"));
}

#[test]
fn bad_selection_fails() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("entry.html");
    fs::write(&entry, "<p>x</p>").unwrap();

    let output = run(
        &["state", entry.to_str().unwrap(), "--at", "zero"],
        dir.path(),
    );
    assert!(!output.status.success());
}

#[test]
fn malformed_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("editor.toml"), "default_theme = 3").unwrap();

    let output = run(&["palette"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error: "));
}
