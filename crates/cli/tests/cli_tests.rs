// End-to-end tests for the `xcoord` binary: exit codes, stdout contract,
// config handling.
//
// Run with: cargo test -p xcoord-cli --test cli_tests -- --nocapture

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const SAMPLE: &str = "fix N42.3, W102.4 and camp 38SMB44888\n";

/// Binary with the per-user config directory pointed at `home`.
fn xcoord(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_xcoord"));
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home).env_remove("RUST_LOG");
    cmd
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ===========================================================================
// xcoord extract
// ===========================================================================

#[test]
fn extract_file_prints_single_json_document() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "report.txt", SAMPLE);

    let output = xcoord(dir.path())
        .args(["extract", input.to_str().unwrap(), "--doc-id", "r1"])
        .output()
        .expect("xcoord extract");

    assert!(output.status.success(), "exit: {:?}\nstderr: {}", output.status, stderr(&output));

    let val: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout must be one JSON value");
    assert_eq!(val["meta"]["doc_id"], "r1");
    let matches = val["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0]["id"], "r1#1");
    assert_eq!(matches[0]["family"], "dd");
    assert_eq!(matches[2]["alternate_of"], "r1#2");

    // summary goes to stderr, never into the JSON stream
    assert!(stderr(&output).contains("3 match(es)"));
}

#[test]
fn extract_reads_stdin_and_derives_doc_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = xcoord(dir.path())
        .args(["extract", "--format", "text"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(SAMPLE.as_bytes()).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.contains("42.3, -102.4"));

    // doc id is a 16-char hex prefix of the text hash
    let doc_id = stderr(&output).split(':').next().unwrap().to_string();
    assert_eq!(doc_id.len(), 16);
    assert!(doc_id.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn extract_no_matches_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "empty.txt", "nothing to see here\n");

    let output = xcoord(dir.path()).args(["extract", input.to_str().unwrap()]).output().unwrap();

    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    let val: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(val["matches"].as_array().unwrap().len(), 0);
    assert!(!stderr(&output).contains("error:"));
}

#[test]
fn extract_family_restriction() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "report.txt", SAMPLE);

    let output = xcoord(dir.path())
        .args(["extract", input.to_str().unwrap(), "--family", "mgrs,mgrs"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let val: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(val["meta"]["families"], serde_json::json!(["mgrs"]));
    let matches = val["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m["family"] == "mgrs"));
}

#[test]
fn extract_strict_drops_odd_mgrs() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "grid.txt", "camp 38SMB44888\n");

    let output = xcoord(dir.path())
        .args(["extract", input.to_str().unwrap(), "--strict"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
}

#[test]
fn extract_csv_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "report.txt", SAMPLE);
    let out = dir.path().join("coords.csv");

    let output = xcoord(dir.path())
        .args([
            "extract",
            input.to_str().unwrap(),
            "-f",
            "csv",
            "-o",
            out.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(output.stdout.is_empty(), "stdout must stay empty with --output");
    assert!(stderr(&output).contains("wrote "));

    let csv = std::fs::read_to_string(&out).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("id,start,end,matchtext,family,method"));
    assert_eq!(lines.count(), 3);
}

#[test]
fn extract_missing_input_exits_4() {
    let dir = tempfile::tempdir().unwrap();
    let output = xcoord(dir.path())
        .args(["extract", dir.path().join("nope.txt").to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).starts_with("error: cannot read"));
}

#[test]
fn extract_picks_up_user_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("xcoord")).unwrap();
    write_file(&dir.path().join("xcoord"), "config.toml", "families = [\"utm\"]\n");
    let input = write_file(dir.path(), "report.txt", SAMPLE);

    let output = xcoord(dir.path()).args(["extract", input.to_str().unwrap()]).output().unwrap();

    // Only observable on platforms where the config dir follows XDG_CONFIG_HOME.
    if cfg!(target_os = "linux") {
        assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    }
}

// ===========================================================================
// xcoord validate
// ===========================================================================

#[test]
fn validate_accepts_good_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(
        dir.path(),
        "xcoord.toml",
        "families = [\"dd\", \"MGRS\"]\ncontext_width = 20\n\n[patterns]\ndisabled = [\"DD-03\"]\n",
    );

    let output = xcoord(dir.path()).args(["validate", config.to_str().unwrap()]).output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("families DD,MGRS"));
}

#[test]
fn validate_parse_error_exits_10() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "bad.toml", "families = [\"dd\"\nbogus_key = 1\n");

    let output = xcoord(dir.path()).args(["validate", config.to_str().unwrap()]).output().unwrap();

    assert_eq!(output.status.code(), Some(10));
    assert!(stderr(&output).contains("hint:  check"));
}

#[test]
fn validate_unknown_pattern_exits_11() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "bad.toml", "[patterns]\ndisabled = [\"DD-99\"]\n");

    let output = xcoord(dir.path()).args(["validate", config.to_str().unwrap()]).output().unwrap();

    assert_eq!(output.status.code(), Some(11));
    assert!(stderr(&output).contains("DD-99"));
}

// ===========================================================================
// xcoord patterns
// ===========================================================================

#[test]
fn patterns_lists_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let output = xcoord(dir.path()).args(["patterns"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 16);
    assert!(stdout.lines().any(|l| l.starts_with("MGRS-01")));
}

#[test]
fn patterns_family_filter() {
    let dir = tempfile::tempdir().unwrap();
    let output = xcoord(dir.path()).args(["patterns", "--family", "utm"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.lines().all(|l| l.starts_with("UTM-")));
}

#[test]
fn patterns_self_test_passes() {
    let dir = tempfile::tempdir().unwrap();
    let output = xcoord(dir.path()).args(["patterns", "--self-test"]).output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).starts_with("ok: 16 patterns"));
}
