use std::fs;
use std::path::{Path, PathBuf};

use aurora_core::protocol::{Role, encode_frame};
use aurora_core::{Hold, Rgb};

/// Reference solo frame: one white hold at position 10, reserved and terminator bytes zeroed.
const REFERENCE_SOLO: [u8; 9] = [1, 4, 162, 0, 84, 10, 0, 255, 0];
const NOISE: [u8; 3] = [0, 255, 7];

const RED: Rgb = Rgb::new(255, 0, 0);
const GREEN: Rgb = Rgb::new(0, 255, 0);
const BLUE: Rgb = Rgb::new(0, 0, 255);
const WHITE: Rgb = Rgb::new(255, 255, 255);

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_fixture(&root.join("solo"), &[REFERENCE_SOLO.to_vec()])?;
    write_fixture(&root.join("group"), &group_frames()?)?;
    write_fixture(&root.join("corrupt"), &corrupt_frames()?)?;
    write_fixture(
        &root.join("out_of_range"),
        &[frame(Role::Solo, &[Hold::new(499, WHITE), Hold::new(600, RED)])?],
    )?;
    Ok(())
}

fn group_frames() -> Result<Vec<Vec<u8>>, String> {
    Ok(vec![
        frame(Role::First, &[Hold::new(1, RED)])?,
        frame(Role::Middle { marker: b'Q' }, &[Hold::new(300, GREEN)])?,
        frame(Role::Last, &[Hold::new(2, BLUE)])?,
    ])
}

/// Noise, a first frame with a zeroed checksum, a last frame with no group
/// open, then a valid solo frame.
fn corrupt_frames() -> Result<Vec<Vec<u8>>, String> {
    let mut bad_checksum = frame(Role::First, &[Hold::new(1, RED)])?;
    bad_checksum[2] = 0;
    Ok(vec![
        NOISE.to_vec(),
        bad_checksum,
        frame(Role::Last, &[Hold::new(2, BLUE)])?,
        REFERENCE_SOLO.to_vec(),
    ])
}

fn frame(role: Role, holds: &[Hold]) -> Result<Vec<u8>, String> {
    encode_frame(role, holds).map_err(|err| format!("failed to encode {role} frame: {err}"))
}

fn write_fixture(dir: &Path, parts: &[Vec<u8>]) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|err| format!("failed to create {}: {}", dir.display(), err))?;
    let path = dir.join("input.bin");
    fs::write(&path, parts.concat())
        .map_err(|err| format!("failed to write {}: {}", path.display(), err))
}
