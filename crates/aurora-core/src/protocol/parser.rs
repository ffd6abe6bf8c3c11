use tracing::debug;

use super::checksum::checksum8;
use super::color::decode_color;
use super::error::FrameError;
use super::layout;
use super::reader::FrameReader;
use super::role::Role;
use crate::Hold;

/// A complete frame whose length and checksum have been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub checksum: u8,
    /// Opaque byte at offset 3, carried through untouched.
    pub reserved: u8,
    pub role: Role,
    pub holds: Vec<Hold>,
    /// Opaque last byte of the frame, carried through untouched.
    pub terminator: u8,
}

/// Validate one complete frame and decode its holds.
///
/// Checksum failures are reported before anything else is decoded. A payload
/// two bytes short of a whole triplet takes the terminator as the last color;
/// a single stray payload byte is ignored.
pub fn parse_frame(frame: &[u8]) -> Result<Frame, FrameError> {
    let reader = FrameReader::new(frame);
    reader.require_len(layout::MIN_FRAME_LEN)?;

    let sync = reader.read_u8(layout::SYNC_OFFSET)?;
    if sync != layout::SYNC {
        return Err(FrameError::MissingSync { found: sync });
    }

    let declared = reader.declared_len()?;
    if declared != frame.len() {
        return Err(FrameError::LengthMismatch {
            declared,
            actual: frame.len(),
        });
    }

    let expected = reader.read_u8(layout::CHECKSUM_OFFSET)?;
    let computed = checksum8(reader.checksum_region()?);
    if expected != computed {
        return Err(FrameError::ChecksumMismatch { expected, computed });
    }

    let role = Role::from_marker(reader.read_u8(layout::ROLE_OFFSET)?);
    let (offsets, skipped) = reader.triplet_offsets();
    if skipped > 0 {
        debug!(skipped, "ignoring stray byte at end of payload");
    }
    let holds = offsets
        .map(|offset| {
            let (position, packed) = reader.read_triplet(offset)?;
            Ok(Hold::new(position, decode_color(packed)))
        })
        .collect::<Result<Vec<_>, FrameError>>()?;

    Ok(Frame {
        checksum: expected,
        reserved: reader.read_u8(layout::RESERVED_OFFSET)?,
        role,
        holds,
        terminator: reader.read_u8(frame.len() - 1)?,
    })
}
