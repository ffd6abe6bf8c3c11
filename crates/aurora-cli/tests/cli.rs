use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("aurora"))
}

fn golden_input(case: &str) -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .expect("crates dir")
        .join("aurora-core")
        .join("tests")
        .join("golden")
        .join(case)
        .join("input.bin")
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> Value {
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn help_works_for_every_command() {
    for command in ["replay", "encode", "info"] {
        cmd().arg(command).arg("--help").assert().success();
    }
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.bin");
    let report = temp.path().join("report.json");

    cmd()
        .arg("replay")
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(
            contains("error: capture not found")
                .and(contains("hint:"))
                .and(contains("aurora encode")),
        );
}

#[test]
fn glob_without_match_names_pattern() {
    let temp = TempDir::new().expect("tempdir");
    let pattern = temp.path().join("*.bin");

    cmd()
        .arg("replay")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("no capture matches").and(contains("hint:")));
}

#[test]
fn stdout_outputs_json() {
    let assert = cmd()
        .arg("replay")
        .arg(golden_input("group"))
        .arg("--stdout")
        .assert()
        .success();
    let json = stdout_json(&assert);
    assert_eq!(json["decode"]["batches_ready"], 1);
    assert_eq!(json["batches"][0]["holds"].as_array().map(Vec::len), Some(3));
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("replay")
        .arg(golden_input("solo"))
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("replay")
        .arg(golden_input("solo"))
        .arg("-o")
        .arg(report)
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn report_file_is_written_and_announced() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("nested").join("report.json");

    cmd()
        .arg("replay")
        .arg(golden_input("solo"))
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stderr(contains("OK: report written"));

    let text = std::fs::read_to_string(&report).expect("read report");
    let json: Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(json["tool"]["name"], "aurora");
    assert_eq!(json["batches"][0]["holds"][0]["position"], 10);
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("replay")
        .arg(golden_input("solo"))
        .arg("-o")
        .arg(report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
}

#[test]
fn report_cannot_overwrite_capture() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("capture.bin");
    std::fs::copy(golden_input("solo"), &input).expect("copy fixture");

    cmd()
        .arg("replay")
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("report would overwrite the capture"));
}

#[test]
fn glob_input_resolves_single_match() {
    let temp = TempDir::new().expect("tempdir");
    std::fs::copy(golden_input("solo"), temp.path().join("only.bin")).expect("copy fixture");
    let pattern = temp.path().join("*.bin");

    let assert = cmd()
        .arg("replay")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .success();
    assert_eq!(stdout_json(&assert)["decode"]["batches_ready"], 1);
}

#[test]
fn glob_input_rejects_multiple_matches() {
    let temp = TempDir::new().expect("tempdir");
    std::fs::copy(golden_input("solo"), temp.path().join("a.bin")).expect("copy fixture");
    std::fs::copy(golden_input("group"), temp.path().join("b.bin")).expect("copy fixture");
    let pattern = temp.path().join("*.bin");

    cmd()
        .arg("replay")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("2 captures match").and(contains("once per capture")));
}

#[test]
fn list_batches_outputs_holds() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("replay")
        .arg(golden_input("out_of_range"))
        .arg("-o")
        .arg(report)
        .arg("--list-batches")
        .assert()
        .success()
        .stderr(contains("Batches:").and(contains("1 out of range")));
}

#[test]
fn strict_fails_when_frames_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("replay")
        .arg(golden_input("corrupt"))
        .arg("-o")
        .arg(&report)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("rejected frames detected"));
    assert!(report.exists());
}

#[test]
fn strict_passes_on_clean_capture() {
    cmd()
        .arg("replay")
        .arg(golden_input("group"))
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .success();
}

#[test]
fn invalid_board_name_is_rejected() {
    cmd()
        .arg("replay")
        .arg(golden_input("solo"))
        .arg("--stdout")
        .arg("--name")
        .arg("bad@name")
        .assert()
        .failure()
        .stderr(contains("invalid board configuration").and(contains("hint:")));
}

#[test]
fn zero_chunk_size_is_rejected() {
    cmd()
        .arg("replay")
        .arg(golden_input("solo"))
        .arg("--stdout")
        .arg("--chunk-size")
        .arg("0")
        .assert()
        .failure()
        .stderr(contains("chunk size must be at least 1"));
}

#[test]
fn encode_writes_frames_that_replay() {
    let temp = TempDir::new().expect("tempdir");
    let capture = temp.path().join("capture.bin");

    cmd()
        .arg("encode")
        .arg("-o")
        .arg(&capture)
        .arg("10:ffffff")
        .assert()
        .success()
        .stderr(contains("OK: 1 holds in 1 frames (9 bytes)"));

    let bytes = std::fs::read(&capture).expect("read capture");
    assert_eq!(bytes, vec![1, 4, 162, 2, 84, 10, 0, 255, 3]);

    let assert = cmd()
        .arg("replay")
        .arg(&capture)
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .success();
    let json = stdout_json(&assert);
    assert_eq!(json["decode"]["batches_ready"], 1);
    assert_eq!(json["batches"][0]["holds"][0]["red"], 255);
}

#[test]
fn encode_splits_large_groups() {
    let temp = TempDir::new().expect("tempdir");
    let capture = temp.path().join("capture.bin");
    let holds: Vec<String> = (0..100).map(|pos| format!("{pos}:00ff00")).collect();

    cmd()
        .arg("encode")
        .arg("-o")
        .arg(&capture)
        .args(&holds)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());

    let assert = cmd()
        .arg("replay")
        .arg(&capture)
        .arg("--stdout")
        .assert()
        .success();
    let json = stdout_json(&assert);
    assert_eq!(json["decode"]["frames_accepted"], 2);
    assert_eq!(json["batches"][0]["holds"].as_array().map(Vec::len), Some(100));
}

#[test]
fn encode_rejects_malformed_hold() {
    let temp = TempDir::new().expect("tempdir");

    cmd()
        .arg("encode")
        .arg("-o")
        .arg(temp.path().join("capture.bin"))
        .arg("10-ffffff")
        .assert()
        .failure()
        .stderr(contains("invalid hold").and(contains("hint:")));
}

#[test]
fn info_prints_advertised_name() {
    cmd()
        .arg("info")
        .arg("--name")
        .arg("Home Wall")
        .arg("--api-level")
        .arg("2")
        .assert()
        .success()
        .stdout(contains("Home Wall@2").and(contains("4488B571-7806-4DF6-BCFF-A2897E4953FF")));
}

#[test]
fn info_json_is_valid() {
    let assert = cmd().arg("info").arg("--json").assert().success();
    let json = stdout_json(&assert);
    assert_eq!(json["advertised_name"], "Aurora Board@3");
    assert_eq!(json["led_count"], 500);
}
