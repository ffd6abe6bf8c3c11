//! Frame construction, the sending side of the protocol.
//!
//! The board never transmits frames; the encoder exists to produce traffic
//! the decoder accepts (fixtures, tests, the `encode` CLI command).

use super::checksum::checksum8;
use super::color::encode_color;
use super::error::FrameError;
use super::layout;
use super::role::Role;
use crate::Hold;

/// Build one frame carrying `holds` with the given role.
pub fn encode_frame(role: Role, holds: &[Hold]) -> Result<Vec<u8>, FrameError> {
    if holds.len() > layout::MAX_HOLDS_PER_FRAME {
        return Err(FrameError::TooManyHolds {
            count: holds.len(),
            max: layout::MAX_HOLDS_PER_FRAME,
        });
    }
    Ok(build_frame(role, holds))
}

fn build_frame(role: Role, holds: &[Hold]) -> Vec<u8> {
    let mut region = Vec::with_capacity(1 + holds.len() * layout::HOLD_LEN);
    region.push(role.marker());
    for hold in holds {
        region.extend_from_slice(&hold.position.to_le_bytes());
        region.push(encode_color(hold.color()));
    }

    let mut frame = Vec::with_capacity(region.len() + layout::FRAME_OVERHEAD);
    frame.push(layout::SYNC);
    frame.push(region.len() as u8);
    frame.push(checksum8(&region));
    frame.push(layout::RESERVED_MARKER);
    frame.extend_from_slice(&region);
    frame.push(layout::TERMINATOR);
    frame
}

/// Split `holds` into a complete group: one solo frame when everything fits,
/// otherwise first, middle..., last.
pub fn encode_holds(holds: &[Hold]) -> Vec<Vec<u8>> {
    if holds.len() <= layout::MAX_HOLDS_PER_FRAME {
        return vec![build_frame(Role::Solo, holds)];
    }

    let chunks: Vec<&[Hold]> = holds.chunks(layout::MAX_HOLDS_PER_FRAME).collect();
    let last = chunks.len() - 1;
    chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let role = match index {
                0 => Role::First,
                i if i == last => Role::Last,
                _ => Role::Middle {
                    marker: layout::ROLE_MIDDLE,
                },
            };
            build_frame(role, chunk)
        })
        .collect()
}
