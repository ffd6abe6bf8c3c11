pub const SYNC_OFFSET: usize = 0;
pub const LENGTH_OFFSET: usize = 1;
pub const CHECKSUM_OFFSET: usize = 2;
pub const RESERVED_OFFSET: usize = 3;
pub const ROLE_OFFSET: usize = 4;
pub const PAYLOAD_OFFSET: usize = 5;

/// Bytes not counted by the length field: sync, length, checksum, reserved, terminator.
pub const FRAME_OVERHEAD: usize = 5;
pub const MIN_FRAME_LEN: usize = FRAME_OVERHEAD;
pub const MAX_FRAME_LEN: usize = u8::MAX as usize + FRAME_OVERHEAD;

pub const SYNC: u8 = 0x01;
pub const RESERVED_MARKER: u8 = 0x02;
pub const TERMINATOR: u8 = 0x03;

pub const ROLE_SOLO: u8 = b'T';
pub const ROLE_FIRST: u8 = b'R';
pub const ROLE_MIDDLE: u8 = b'Q';
pub const ROLE_LAST: u8 = b'S';

pub const HOLD_LEN: usize = 3;
/// Largest hold count whose role byte and triplets still fit the length field.
pub const MAX_HOLDS_PER_FRAME: usize = (u8::MAX as usize - 1) / HOLD_LEN;

/// Total frame length announced by the length byte.
pub const fn frame_len(length_field: u8) -> usize {
    length_field as usize + FRAME_OVERHEAD
}

/// Index range covered by the checksum: role byte through the last payload byte.
pub fn checksum_range(frame_len: usize) -> std::ops::Range<usize> {
    ROLE_OFFSET..frame_len.saturating_sub(1).max(ROLE_OFFSET)
}

/// Index range of the triplet payload, terminator excluded.
pub fn payload_range(frame_len: usize) -> std::ops::Range<usize> {
    PAYLOAD_OFFSET..frame_len.saturating_sub(1).max(PAYLOAD_OFFSET)
}
