use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use aurora_core::{DEFAULT_GENERATED_AT, ReplayOptions, Report, replay_file};

const CAPTURE: &str = "input.bin";
const EXPECTED: &str = "expected_report.json";

fn main() -> ExitCode {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("golden");
    match regenerate_all(&root) {
        Ok(0) => {
            eprintln!("error: no captures under {}", root.display());
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(1)
        }
    }
}

/// Replay every `<case>/input.bin` and rewrite its expected report.
fn regenerate_all(root: &Path) -> Result<usize, String> {
    let cases = capture_dirs(root)?;
    for case in &cases {
        let report = replay_case(case)?;
        let mut json = serde_json::to_string_pretty(&report)
            .map_err(|err| format!("cannot serialize report for {}: {}", case.display(), err))?;
        json.push('\n');

        let expected = case.join(EXPECTED);
        fs::write(&expected, json)
            .map_err(|err| format!("cannot write {}: {}", expected.display(), err))?;
        println!(
            "{}: {} batches, {} frames rejected",
            case.file_name().unwrap_or_default().to_string_lossy(),
            report.batches.len(),
            report.decode.frames_rejected
        );
    }
    Ok(cases.len())
}

/// Case directories holding a capture, in name order so output is stable.
fn capture_dirs(root: &Path) -> Result<Vec<PathBuf>, String> {
    let entries =
        fs::read_dir(root).map_err(|err| format!("cannot list {}: {}", root.display(), err))?;
    let mut cases = Vec::new();
    for entry in entries {
        let dir = entry
            .map_err(|err| format!("cannot list {}: {}", root.display(), err))?
            .path();
        if dir.join(CAPTURE).is_file() {
            cases.push(dir);
        }
    }
    cases.sort();
    Ok(cases)
}

/// Replay with default options, pinning the fields that depend on the checkout.
fn replay_case(case: &Path) -> Result<Report, String> {
    let capture = case.join(CAPTURE);
    let mut report = replay_file(&capture, &ReplayOptions::default())
        .map_err(|err| format!("replay of {} failed: {}", capture.display(), err))?;
    report.generated_at = DEFAULT_GENERATED_AT.to_string();
    report.input.path = CAPTURE.to_string();
    Ok(report)
}
