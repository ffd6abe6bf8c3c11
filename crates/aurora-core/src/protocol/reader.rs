use super::error::FrameError;
use super::layout;

pub struct FrameReader<'a> {
    frame: &'a [u8],
}

impl<'a> FrameReader<'a> {
    pub fn new(frame: &'a [u8]) -> Self {
        Self { frame }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), FrameError> {
        if self.frame.len() < needed {
            return Err(FrameError::TooShort {
                needed,
                actual: self.frame.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, FrameError> {
        self.frame
            .get(offset)
            .copied()
            .ok_or(FrameError::TooShort {
                needed: offset + 1,
                actual: self.frame.len(),
            })
    }

    pub fn read_u16_le(&self, offset: usize) -> Result<u16, FrameError> {
        let bytes = self.read_slice(offset..offset + 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], FrameError> {
        self.frame.get(range.clone()).ok_or(FrameError::TooShort {
            needed: range.end,
            actual: self.frame.len(),
        })
    }

    /// Total length announced by the length byte.
    pub fn declared_len(&self) -> Result<usize, FrameError> {
        Ok(layout::frame_len(self.read_u8(layout::LENGTH_OFFSET)?))
    }

    /// Bytes protected by the checksum.
    pub fn checksum_region(&self) -> Result<&'a [u8], FrameError> {
        self.read_slice(layout::checksum_range(self.frame.len()))
    }

    /// Position and packed color of the triplet starting at `offset`.
    pub fn read_triplet(&self, offset: usize) -> Result<(u16, u8), FrameError> {
        Ok((self.read_u16_le(offset)?, self.read_u8(offset + 2)?))
    }

    /// Offsets of the triplets starting inside the payload, plus the count of
    /// payload bytes too few to start one.
    ///
    /// A triplet may start as late as two bytes before the terminator; its
    /// color is then the terminator itself. A single stray byte before the
    /// terminator starts nothing.
    pub fn triplet_offsets(&self) -> (std::iter::StepBy<std::ops::Range<usize>>, usize) {
        let payload = layout::payload_range(self.frame.len());
        let count = (payload.len() + 1) / layout::HOLD_LEN;
        let covered = (count * layout::HOLD_LEN).min(payload.len());
        let skipped = payload.len() - covered;
        let offsets = (payload.start..payload.start + count * layout::HOLD_LEN)
            .step_by(layout::HOLD_LEN);
        (offsets, skipped)
    }
}
