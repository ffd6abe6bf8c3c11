use std::fs;
use std::path::{Path, PathBuf};

use aurora_core::{BoardConfig, Report, ReplayOptions, SessionError, replay_file};

fn golden_dir(case: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("golden")
        .join(case)
}

fn load_expected_report(case: &str) -> Report {
    let expected_path = golden_dir(case).join("expected_report.json");
    let expected_json = fs::read_to_string(&expected_path).expect("read expected_report.json");
    serde_json::from_str(&expected_json).expect("parse expected report")
}

fn run_golden(case: &str) {
    let input = golden_dir(case).join("input.bin");
    let expected = load_expected_report(case);

    let mut actual = replay_file(&input, &ReplayOptions::default()).expect("replay capture");
    actual.generated_at = expected.generated_at.clone();
    actual.input.path = expected.input.path.clone();

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");

    assert_eq!(actual_value, expected_value, "golden mismatch in {case}");
}

#[test]
fn golden_solo() {
    run_golden("solo");
}

#[test]
fn golden_group() {
    run_golden("group");
}

#[test]
fn golden_corrupt() {
    run_golden("corrupt");
}

#[test]
fn golden_out_of_range() {
    run_golden("out_of_range");
}

#[test]
fn golden_corrupt_counts_both_failure_kinds() {
    let report = load_expected_report("corrupt");
    assert_eq!(report.decode.checksum_failures, 1);
    assert_eq!(report.decode.ordering_violations, 1);
    assert_eq!(report.batches.len(), 1);
}

#[test]
fn golden_group_is_independent_of_chunk_size() {
    let input = golden_dir("group").join("input.bin");
    let expected = load_expected_report("group");
    for chunk_size in [1, 2, 5, 9, 64] {
        let options = ReplayOptions {
            chunk_size,
            ..ReplayOptions::default()
        };
        let report = replay_file(&input, &options).expect("replay capture");
        let holds: Vec<_> = report.batches.iter().map(|b| b.holds.clone()).collect();
        let expected_holds: Vec<_> = expected.batches.iter().map(|b| b.holds.clone()).collect();
        assert_eq!(holds, expected_holds, "chunk size {chunk_size}");
        assert_eq!(report.transport.chunks_total, 27_u64.div_ceil(chunk_size as u64));
    }
}

#[test]
fn replay_file_rejects_invalid_board() {
    let options = ReplayOptions {
        board: BoardConfig {
            api_level: 0,
            ..BoardConfig::default()
        },
        ..ReplayOptions::default()
    };
    let err = replay_file(&golden_dir("solo").join("input.bin"), &options).unwrap_err();
    assert!(matches!(err, SessionError::Config(_)), "{err}");
}
